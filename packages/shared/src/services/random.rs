use rand::Rng;

/// Uniform index picker behind a seam so werewolf role selection is
/// deterministic under test.
pub trait RandomSource: Send + Sync {
    /// Uniform pick in `[0, bound)`. `bound` must be non-zero.
    fn pick(&self, bound: usize) -> usize;
}

pub struct ThreadRngSource;

impl RandomSource for ThreadRngSource {
    fn pick(&self, bound: usize) -> usize {
        rand::thread_rng().gen_range(0..bound)
    }
}
