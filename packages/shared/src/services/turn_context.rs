use std::sync::Arc;

use crate::models::game::Game;
use crate::models::team::{Team, TeamMember};
use crate::repositories::member_repository::TeamMemberRepository;
use crate::repositories::team_repository::TeamRepository;
use crate::services::errors::turn_context_errors::TurnContextError;

/// Everything the mutating services need to know about whose turn it
/// is: the team to move, its ordered active roster, the clamped
/// rotation index, and the opposing team.
#[derive(Debug, Clone)]
pub struct TurnContext {
    pub team_to_move: Team,
    pub opposing_team: Team,
    pub roster: Vec<TeamMember>,
    pub roster_index: usize,
}

impl TurnContext {
    /// The roster member whose move it is.
    pub fn must_play(&self) -> &TeamMember {
        &self.roster[self.roster_index]
    }
}

pub struct TurnContextResolver {
    teams: Arc<dyn TeamRepository + Send + Sync>,
    members: Arc<dyn TeamMemberRepository + Send + Sync>,
}

impl TurnContextResolver {
    pub fn new(
        teams: Arc<dyn TeamRepository + Send + Sync>,
        members: Arc<dyn TeamMemberRepository + Send + Sync>,
    ) -> Self {
        TurnContextResolver { teams, members }
    }

    pub async fn resolve(&self, game: &Game) -> Result<TurnContext, TurnContextError> {
        let team_to_move = self
            .teams
            .get_team(&game.id, game.turn_team)
            .await
            .map_err(|e| TurnContextError::RepositoryError(e.to_string()))?;
        let opposing_team = self
            .teams
            .get_team(&game.id, game.turn_team.opponent())
            .await
            .map_err(|e| TurnContextError::RepositoryError(e.to_string()))?;
        let roster = self
            .members
            .active_members_ordered(&team_to_move.id)
            .await
            .map_err(|e| TurnContextError::RepositoryError(e.to_string()))?;
        if roster.is_empty() {
            return Err(TurnContextError::NoPlayersInTeam);
        }
        // The stored index can run past the roster end when members
        // deactivate; clamp rather than fail.
        let roster_index = team_to_move.current_index.min(roster.len() - 1);
        Ok(TurnContext {
            team_to_move,
            opposing_team,
            roster,
            roster_index,
        })
    }

    /// As `resolve`, additionally requiring `user_id` to be the
    /// designated mover.
    pub async fn resolve_for_actor(
        &self,
        game: &Game,
        user_id: &str,
    ) -> Result<TurnContext, TurnContextError> {
        let context = self.resolve(game).await?;
        if context.must_play().user_id != user_id {
            return Err(TurnContextError::NotYourTurn);
        }
        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::game::{GameMode, TeamName};
    use crate::repositories::member_repository::MockTeamMemberRepository;
    use crate::repositories::team_repository::MockTeamRepository;

    fn fixture() -> (Game, Team, Team, Vec<TeamMember>) {
        let game = Game::new(GameMode::Classic);
        let team_a = Team::new(&game.id, TeamName::A);
        let team_b = Team::new(&game.id, TeamName::B);
        let roster = vec![
            TeamMember::new(&team_a.id, &game.id, "u1", 0),
            TeamMember::new(&team_a.id, &game.id, "u2", 1),
        ];
        (game, team_a, team_b, roster)
    }

    fn resolver_for(
        team_a: Team,
        team_b: Team,
        roster: Vec<TeamMember>,
    ) -> TurnContextResolver {
        let mut teams = MockTeamRepository::new();
        let a = team_a.clone();
        let b = team_b.clone();
        teams.expect_get_team().returning(move |_, name| {
            let team = if name == TeamName::A { a.clone() } else { b.clone() };
            Box::pin(async move { Ok(team) })
        });
        let mut members = MockTeamMemberRepository::new();
        members.expect_active_members_ordered().returning(move |_| {
            let roster = roster.clone();
            Box::pin(async move { Ok(roster) })
        });
        TurnContextResolver::new(Arc::new(teams), Arc::new(members))
    }

    #[tokio::test]
    async fn test_resolve_identifies_must_play_member() {
        let (game, team_a, team_b, roster) = fixture();
        let resolver = resolver_for(team_a, team_b, roster);

        let context = resolver.resolve(&game).await.unwrap();

        assert_eq!(context.team_to_move.name, TeamName::A);
        assert_eq!(context.opposing_team.name, TeamName::B);
        assert_eq!(context.roster_index, 0);
        assert_eq!(context.must_play().user_id, "u1");
    }

    #[tokio::test]
    async fn test_resolve_clamps_out_of_range_index() {
        let (game, mut team_a, team_b, roster) = fixture();
        team_a.current_index = 7;
        let resolver = resolver_for(team_a, team_b, roster);

        let context = resolver.resolve(&game).await.unwrap();

        assert_eq!(context.roster_index, 1);
        assert_eq!(context.must_play().user_id, "u2");
    }

    #[tokio::test]
    async fn test_resolve_rejects_empty_roster() {
        let (game, team_a, team_b, _) = fixture();
        let resolver = resolver_for(team_a, team_b, vec![]);

        let result = resolver.resolve(&game).await;

        assert!(matches!(
            result.unwrap_err(),
            TurnContextError::NoPlayersInTeam
        ));
    }

    #[tokio::test]
    async fn test_resolve_for_actor_rejects_wrong_user() {
        let (game, team_a, team_b, roster) = fixture();
        let resolver = resolver_for(team_a, team_b, roster);

        let result = resolver.resolve_for_actor(&game, "u2").await;

        assert!(matches!(result.unwrap_err(), TurnContextError::NotYourTurn));
    }
}
