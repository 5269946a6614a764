//! Line-oriented presentation driver.

use anyhow::Result;
use taboo_core::{RoundTally, standings, winners};
use taboo_types::{GameAction, GameMode, GameSettings, GameState, GameStatus, Player, Team};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::session::GameSession;

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Action(GameAction),
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
setup:   team <name> | player <name> [team #] | mode teams|individual | time <s>
         rounds <n> | target <n> | limit <n> | prendas on|off | skips on|off | start
turn:    round | next | end
teams:   ok | skip | taboo
single:  winner <player #> | taboo | pass
prenda:  done | fail
other:   restart [all] | show | help | quit";

/// Maps one console line to a command. Player and team numbers are 1-based
/// positions in the current rosters.
pub fn parse_command(line: &str, state: &GameState) -> Option<ConsoleCommand> {
    let mut words = line.split_whitespace();
    let verb = words.next()?.to_lowercase();
    let rest: Vec<&str> = words.collect();
    let arg = rest.join(" ");
    let individual = state.settings.mode == GameMode::Individual;

    let action = match verb.as_str() {
        "show" | "status" => return Some(ConsoleCommand::Show),
        "help" | "?" => return Some(ConsoleCommand::Help),
        "quit" | "exit" => return Some(ConsoleCommand::Quit),
        "start" => GameAction::StartGame,
        "round" => GameAction::StartRound,
        "end" => GameAction::EndRound,
        "next" => GameAction::NextTurn,
        "ok" | "correct" => GameAction::ScoreCard,
        "skip" => GameAction::SkipCard,
        "pass" => GameAction::SkipRound,
        "taboo" if individual => GameAction::DeclareTaboo,
        "taboo" => GameAction::RecordRefusal,
        "done" => GameAction::PrendaDone,
        "fail" => GameAction::FailPrenda,
        "restart" => GameAction::RestartGame {
            reset_teams: arg == "all",
        },
        "winner" => {
            let index = nth(&arg)?;
            GameAction::DeclareWinner(state.player_scores.get(index)?.player_id)
        }
        "team" if !arg.is_empty() => GameAction::AddTeam(Team::new(
            arg.clone(),
            Team::palette_color(state.teams.len()),
        )),
        "player" if !rest.is_empty() => {
            let (name, team_id) = match rest.split_last() {
                Some((last, init)) if !init.is_empty() && last.parse::<usize>().is_ok() => {
                    let team = state.teams.get(nth(last)?)?;
                    (init.join(" "), Some(team.id))
                }
                _ => (arg.clone(), None),
            };
            GameAction::AddPlayer(Player::new(name, team_id))
        }
        _ => GameAction::UpdateSettings(parse_setting(&verb, &arg, &state.settings)?),
    };
    Some(ConsoleCommand::Action(action))
}

fn nth(arg: &str) -> Option<usize> {
    arg.trim().parse::<usize>().ok()?.checked_sub(1)
}

fn parse_setting(verb: &str, arg: &str, current: &GameSettings) -> Option<GameSettings> {
    let mut settings = current.clone();
    match verb {
        "mode" => {
            settings.mode = match arg {
                "teams" => GameMode::Teams,
                "individual" => GameMode::Individual,
                _ => return None,
            }
        }
        "time" => settings.time_per_round = arg.parse().ok()?,
        "rounds" => settings.rounds = arg.parse().ok()?,
        "target" => settings.score_to_win = arg.parse().ok()?,
        "limit" => settings.cards_per_round = Some(arg.parse().ok()?),
        "prendas" => settings.prendas_enabled = on_off(arg)?,
        "skips" => settings.allow_skips = on_off(arg)?,
        _ => return None,
    }
    Some(settings)
}

fn on_off(arg: &str) -> Option<bool> {
    match arg {
        "on" | "yes" => Some(true),
        "off" | "no" => Some(false),
        _ => None,
    }
}

/// A short text rendering of whatever screen the status calls for.
pub fn render_status(state: &GameState) -> String {
    let mut out = String::new();
    match state.status {
        GameStatus::Setup => {
            out.push_str(&format!(
                "[setup] {:?} mode, {} cards, {} prendas{}\n",
                state.settings.mode,
                state.all_cards.len(),
                state.all_prendas.len(),
                if state.is_loading { " (loading)" } else { "" }
            ));
            for (i, team) in state.teams.iter().enumerate() {
                out.push_str(&format!("  team {}: {}\n", i + 1, team.name));
            }
            for (i, player) in state.players.iter().enumerate() {
                out.push_str(&format!("  player {}: {}\n", i + 1, player.name));
            }
        }
        GameStatus::TurnReady => {
            out.push_str(&format!(
                "[round {}] {} is up. Type 'round' to begin.\n",
                state.current_round_number,
                active_name(state)
            ));
        }
        GameStatus::Playing => {
            if let Some(card) = &state.current_card {
                out.push_str(&format!(
                    "[{}s] {}  (not: {})  score {}\n",
                    state.round_time_remaining,
                    card.word,
                    card.forbidden_words.join(", "),
                    state.current_round_score
                ));
            }
        }
        GameStatus::PrendaAlert => {
            if let Some(prenda) = &state.current_prenda {
                out.push_str(&format!(
                    "PRENDA for {}: {} ('done' or 'fail')\n",
                    active_name(state),
                    prenda.description
                ));
            }
        }
        GameStatus::RoundSummary => {
            let tally = RoundTally::from_results(&state.round_results);
            out.push_str(&format!(
                "Round over for {}: {} correct, {} skipped, {} taboo, best run {}\n",
                active_name(state),
                tally.corrects,
                tally.skips,
                tally.errors,
                tally.streak
            ));
            render_table(state, &mut out);
        }
        GameStatus::GameOver => {
            let names: Vec<String> = winners(state).into_iter().map(|s| s.name).collect();
            out.push_str(&format!("Game over! Winner: {}\n", names.join(" & ")));
            render_table(state, &mut out);
        }
    }
    out
}

fn render_table(state: &GameState, out: &mut String) {
    for standing in standings(state) {
        out.push_str(&format!(
            "  {:<16} {:>4} pts  {:>3}%\n",
            standing.name, standing.score, standing.accuracy
        ));
    }
}

fn active_name(state: &GameState) -> String {
    match state.settings.mode {
        GameMode::Teams => state.current_team().map(|t| t.name.clone()),
        GameMode::Individual => state.current_reader().map(|p| p.player_name.clone()),
    }
    .unwrap_or_default()
}

/// Reads commands from stdin until EOF or `quit`.
pub async fn run_console(session: &GameSession) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{}", HELP);
    print!("{}", render_status(&session.state().await));

    while let Some(line) = lines.next_line().await? {
        let state = session.state().await;
        match parse_command(&line, &state) {
            Some(ConsoleCommand::Quit) => break,
            Some(ConsoleCommand::Help) => println!("{}", HELP),
            Some(ConsoleCommand::Show) => print!("{}", render_status(&state)),
            Some(ConsoleCommand::Action(action)) => match session.dispatch(action).await {
                Ok(next) => print!("{}", render_status(&next)),
                Err(e) => println!("! {}", e),
            },
            None if line.trim().is_empty() => print!("{}", render_status(&state)),
            None => println!("? unknown command, type 'help'"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use taboo_types::PlayerScore;

    fn action(line: &str, state: &GameState) -> GameAction {
        match parse_command(line, state) {
            Some(ConsoleCommand::Action(action)) => action,
            other => panic!("{line:?} parsed as {other:?}"),
        }
    }

    #[test]
    fn test_simple_verbs() {
        let state = GameState::default();
        assert_eq!(action("start", &state), GameAction::StartGame);
        assert_eq!(action("  OK ", &state), GameAction::ScoreCard);
        assert_eq!(action("taboo", &state), GameAction::RecordRefusal);
        assert_eq!(
            action("restart all", &state),
            GameAction::RestartGame { reset_teams: true }
        );
        assert_eq!(parse_command("quit", &state), Some(ConsoleCommand::Quit));
        assert_eq!(parse_command("", &state), None);
        assert_eq!(parse_command("dance", &state), None);
    }

    #[test]
    fn test_taboo_follows_mode() {
        let mut state = GameState::default();
        state.settings.mode = GameMode::Individual;
        assert_eq!(action("taboo", &state), GameAction::DeclareTaboo);
    }

    #[test]
    fn test_roster_commands() {
        let mut state = GameState::default();
        match action("team Los Tigres", &state) {
            GameAction::AddTeam(team) => {
                assert_eq!(team.name, "Los Tigres");
                assert_eq!(team.color, Team::palette_color(0));
            }
            other => panic!("unexpected {other:?}"),
        }

        let team = Team::new("Rojos", "bg-red-500");
        let team_id = team.id;
        state.teams.push(team);
        match action("player Ana María 1", &state) {
            GameAction::AddPlayer(player) => {
                assert_eq!(player.name, "Ana María");
                assert_eq!(player.team_id, Some(team_id));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(parse_command("player Ana 3", &state), None);
    }

    #[test]
    fn test_winner_by_position() {
        let mut state = GameState::default();
        let player = Player::new("Beto", None);
        state.player_scores.push(PlayerScore::from(&Player::new("Ana", None)));
        state.player_scores.push(PlayerScore::from(&player));

        assert_eq!(action("winner 2", &state), GameAction::DeclareWinner(player.id));
        assert_eq!(parse_command("winner 0", &state), None);
        assert_eq!(parse_command("winner 3", &state), None);
    }

    #[test]
    fn test_settings_commands() {
        let state = GameState::default();
        match action("time 45", &state) {
            GameAction::UpdateSettings(settings) => {
                assert_eq!(settings.time_per_round, 45);
                assert_eq!(settings.mode, GameMode::Teams);
            }
            other => panic!("unexpected {other:?}"),
        }
        match action("prendas off", &state) {
            GameAction::UpdateSettings(settings) => assert!(!settings.prendas_enabled),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(parse_command("time soon", &state), None);
    }

    #[test]
    fn test_render_game_over_names_every_winner() {
        let mut state = GameState::default();
        let mut a = Team::new("Rojos", "bg-red-500");
        let mut b = Team::new("Azules", "bg-blue-500");
        a.score = 4;
        b.score = 4;
        state.teams = vec![a, b];
        state.status = GameStatus::GameOver;

        let text = render_status(&state);
        assert!(text.contains("Rojos & Azules"));
    }
}
