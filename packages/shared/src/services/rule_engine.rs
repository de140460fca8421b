use std::str::FromStr;

use chess::{Board, BoardStatus, ChessMove, MoveGen, Piece, Square, EMPTY};

use crate::models::game::STARTPOS;
use crate::services::errors::rule_engine_errors::RuleEngineError;

#[cfg(test)]
use mockall::automock;

/// FEN of the standard initial position, substituted for the
/// `startpos` sentinel before the chess library sees it.
pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

pub fn expand_fen(fen: &str) -> &str {
    if fen == STARTPOS {
        STARTPOS_FEN
    } else {
        fen
    }
}

#[derive(Debug, Clone)]
pub struct AppliedMove {
    pub fen_after: String,
    pub san: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionStatus {
    Ongoing,
    Checkmate,
    Stalemate,
    InsufficientMaterial,
}

/// The move-legality oracle. Everything the turn state machine knows
/// about chess goes through this seam.
#[cfg_attr(test, automock)]
pub trait RuleEngine: Send + Sync {
    /// Applies a coordinate-notation move to a position, returning the
    /// resulting FEN and the move's SAN (with `+`/`#` markers).
    fn apply_uci(&self, fen: &str, uci: &str) -> Result<AppliedMove, RuleEngineError>;
    /// Terminal judgment of a position, for end-of-game conditions the
    /// SAN checkmate marker does not cover.
    fn position_status(&self, fen: &str) -> Result<PositionStatus, RuleEngineError>;
}

pub struct ChessRuleEngine;

impl ChessRuleEngine {
    pub fn new() -> Self {
        ChessRuleEngine
    }

    fn parse_board(fen: &str) -> Result<Board, RuleEngineError> {
        Board::from_str(expand_fen(fen))
            .map_err(|e| RuleEngineError::InvalidPosition(format!("Invalid FEN: {}", e)))
    }

    fn parse_uci(uci: &str) -> Result<ChessMove, RuleEngineError> {
        if uci.len() < 4 || uci.len() > 5 {
            return Err(RuleEngineError::IllegalMove(format!(
                "Malformed move: {}",
                uci
            )));
        }
        let from = Square::from_str(&uci[0..2])
            .map_err(|_| RuleEngineError::IllegalMove(format!("Invalid from square: {}", uci)))?;
        let to = Square::from_str(&uci[2..4])
            .map_err(|_| RuleEngineError::IllegalMove(format!("Invalid to square: {}", uci)))?;
        let promotion = match uci.as_bytes().get(4) {
            Some(b'q') => Some(Piece::Queen),
            Some(b'r') => Some(Piece::Rook),
            Some(b'b') => Some(Piece::Bishop),
            Some(b'n') => Some(Piece::Knight),
            Some(_) => {
                return Err(RuleEngineError::IllegalMove(format!(
                    "Invalid promotion piece: {}",
                    uci
                )))
            }
            None => None,
        };
        Ok(ChessMove::new(from, to, promotion))
    }
}

impl Default for ChessRuleEngine {
    fn default() -> Self {
        ChessRuleEngine::new()
    }
}

impl RuleEngine for ChessRuleEngine {
    fn apply_uci(&self, fen: &str, uci: &str) -> Result<AppliedMove, RuleEngineError> {
        let board = Self::parse_board(fen)?;
        if board.status() != BoardStatus::Ongoing {
            return Err(RuleEngineError::IllegalMove(
                "Position is already terminal".to_string(),
            ));
        }

        let chess_move = Self::parse_uci(uci)?;
        let legal_moves: Vec<ChessMove> = MoveGen::new_legal(&board).collect();
        if !legal_moves.contains(&chess_move) {
            return Err(RuleEngineError::IllegalMove(format!(
                "Move is not legal: {}",
                uci
            )));
        }

        let mut new_board = board;
        board.make_move(chess_move, &mut new_board);

        let san = move_to_san(&board, chess_move, &new_board, &legal_moves);
        Ok(AppliedMove {
            fen_after: format!("{}", new_board),
            san,
        })
    }

    fn position_status(&self, fen: &str) -> Result<PositionStatus, RuleEngineError> {
        let board = Self::parse_board(fen)?;
        match board.status() {
            BoardStatus::Checkmate => Ok(PositionStatus::Checkmate),
            BoardStatus::Stalemate => Ok(PositionStatus::Stalemate),
            BoardStatus::Ongoing => {
                if is_insufficient_material(&board) {
                    Ok(PositionStatus::InsufficientMaterial)
                } else {
                    Ok(PositionStatus::Ongoing)
                }
            }
        }
    }
}

/// Bare kings, or king and a single minor piece against a bare king.
fn is_insufficient_material(board: &Board) -> bool {
    let total = board.combined().popcnt();
    if total == 2 {
        return true;
    }
    if total == 3 {
        let minors =
            board.pieces(Piece::Knight).popcnt() + board.pieces(Piece::Bishop).popcnt();
        return minors == 1;
    }
    false
}

fn file_char(square: Square) -> char {
    (b'a' + square.get_file().to_index() as u8) as char
}

fn rank_char(square: Square) -> char {
    (b'1' + square.get_rank().to_index() as u8) as char
}

fn piece_letter(piece: Piece) -> &'static str {
    match piece {
        Piece::Pawn => "",
        Piece::Knight => "N",
        Piece::Bishop => "B",
        Piece::Rook => "R",
        Piece::Queen => "Q",
        Piece::King => "K",
    }
}

/// Derives SAN for a legal move, including disambiguation, castling
/// and the `+`/`#` suffix taken from the resulting position.
fn move_to_san(
    board: &Board,
    chess_move: ChessMove,
    after: &Board,
    legal_moves: &[ChessMove],
) -> String {
    let source = chess_move.get_source();
    let dest = chess_move.get_dest();
    // Legal moves always have a piece on the source square.
    let piece = match board.piece_on(source) {
        Some(piece) => piece,
        None => return String::new(),
    };

    let mut san = String::new();
    let file_delta =
        (source.get_file().to_index() as i32 - dest.get_file().to_index() as i32).abs();
    if piece == Piece::King && file_delta == 2 {
        if dest.get_file().to_index() > source.get_file().to_index() {
            san.push_str("O-O");
        } else {
            san.push_str("O-O-O");
        }
    } else {
        let is_capture = board.piece_on(dest).is_some()
            || (piece == Piece::Pawn && source.get_file() != dest.get_file());

        if piece == Piece::Pawn {
            if is_capture {
                san.push(file_char(source));
            }
        } else {
            san.push_str(piece_letter(piece));
            if piece != Piece::King {
                // Other same-kind pieces that could also reach dest.
                let rivals: Vec<Square> = legal_moves
                    .iter()
                    .filter(|m| {
                        m.get_dest() == dest
                            && m.get_source() != source
                            && board.piece_on(m.get_source()) == Some(piece)
                    })
                    .map(|m| m.get_source())
                    .collect();
                if !rivals.is_empty() {
                    let file_clashes = rivals
                        .iter()
                        .any(|s| s.get_file() == source.get_file());
                    let rank_clashes = rivals
                        .iter()
                        .any(|s| s.get_rank() == source.get_rank());
                    if !file_clashes {
                        san.push(file_char(source));
                    } else if !rank_clashes {
                        san.push(rank_char(source));
                    } else {
                        san.push(file_char(source));
                        san.push(rank_char(source));
                    }
                }
            }
        }

        if is_capture {
            san.push('x');
        }
        san.push(file_char(dest));
        san.push(rank_char(dest));

        if let Some(promotion) = chess_move.get_promotion() {
            san.push('=');
            san.push_str(piece_letter(promotion));
        }
    }

    if after.status() == BoardStatus::Checkmate {
        san.push('#');
    } else if *after.checkers() != EMPTY {
        san.push('+');
    }
    san
}
