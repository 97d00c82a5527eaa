//! Command handlers for CLI subcommands.

use std::fs;
use std::io::Read;
use std::sync::Arc;

use guide_core::outcome::{FailureReason, Recovery};
use guide_core::{
    classify, ActionRequest, Classification, CommandKind, Conversation, DispatchTable,
    GuideConfig,
};
use guide_planner::{ChatPlanner, PlannerConfig};
use tracing::info;

use crate::cli::{expand_path, Cli, Commands};
use crate::console::{ConsoleSpeaker, ReplListener};
use crate::error::{CliError, Result};
use crate::sim::{SimRobot, WorldFile};

/// Execute the selected command; no subcommand means chat.
pub fn execute(cli: &Cli) -> Result<()> {
    match &cli.command {
        None | Some(Commands::Chat) => run_chat(cli),
        Some(Commands::Classify { text }) => cmd_classify(cli, text.as_deref()),
    }
}

/// Builds the session configuration from command-line options.
pub fn guide_config(cli: &Cli) -> Result<GuideConfig> {
    let mut config = GuideConfig::new();
    if let Some(greeting) = &cli.greeting {
        config = config.with_greeting(greeting.clone());
    }
    if let Some(path) = &cli.preamble {
        let path = expand_path(path);
        let preamble = fs::read_to_string(&path).map_err(|source| CliError::Io {
            path: path.clone(),
            source,
        })?;
        config = config.with_preamble(preamble);
    }
    Ok(config)
}

/// Loads the world file, or the built-in gallery when none is given.
pub fn load_world(cli: &Cli) -> Result<WorldFile> {
    match &cli.world {
        Some(path) => WorldFile::load(&expand_path(path)),
        None => Ok(WorldFile::museum()),
    }
}

fn run_chat(cli: &Cli) -> Result<()> {
    let config = guide_config(cli)?;

    let mut planner_config = PlannerConfig::from_env();
    if let Some(model) = &cli.model {
        planner_config = planner_config.with_model(model.clone());
    }
    let planner = ChatPlanner::new(planner_config);
    if !planner.is_available() {
        return Err(CliError::Config(
            "OPENROUTER_API_KEY not set. Please set it in your environment or .env.local."
                .to_string(),
        ));
    }

    let mut robot = SimRobot::new(load_world(cli)?);
    if let Some(image) = &cli.camera_image {
        robot = robot.with_camera_image(expand_path(image));
    }
    let robot = Arc::new(robot);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;

    let mut listener = ReplListener::new(cli.state_dir(), "you> ")?;

    println!("Museum guide v{}", env!("CARGO_PKG_VERSION"));
    println!("Ctrl+D to leave");
    println!();
    info!(model = %planner.config().model, "starting chat session");

    let mut conversation = Conversation::new(
        config,
        Box::new(planner),
        robot.clone(),
        robot,
        Arc::new(ConsoleSpeaker::new("guide")),
    );

    runtime.block_on(conversation.run(&mut listener))?;

    println!("Goodbye!");
    Ok(())
}

fn cmd_classify(cli: &Cli, text: Option<&str>) -> Result<()> {
    let response = match text {
        Some(text) => text.to_string(),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|source| CliError::Io {
                    path: "<stdin>".into(),
                    source,
                })?;
            buf
        }
    };

    let config = guide_config(cli)?;
    for line in describe(&response, &config) {
        println!("{}", line);
    }
    Ok(())
}

/// Describes how a planner response would be handled, line by line.
///
/// Nothing is executed; parse failures are reported with the recovery that
/// would follow them.
pub fn describe(response: &str, config: &GuideConfig) -> Vec<String> {
    let queue = match classify(response) {
        Classification::Speech(text) => return vec![format!("speech: {}", text)],
        Classification::Commands(queue) => queue,
    };

    let table = DispatchTable::standard();
    let mut out = vec![format!("commands: {} line(s)", queue.len())];
    for (i, line) in queue.iter().enumerate() {
        let kind = table.resolve(line);
        let detail = match kind {
            CommandKind::Unrecognized => "ignored".to_string(),
            _ => match ActionRequest::parse(kind, line, config) {
                Ok(request) => request.to_string(),
                Err(err) => {
                    let reason = FailureReason::from(err.clone());
                    match Recovery::for_failure(kind, &reason) {
                        Recovery::Apologize(message) => {
                            format!("fails ({}), says \"{}\"", err, message)
                        }
                        Recovery::Continue => format!("fails ({}), continues", err),
                    }
                }
            },
        };
        out.push(format!("{:>3}. {:<28} {}", i + 1, line.as_str(), detail));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_describe_speech() {
        let lines = describe("The painting is a landscape.", &GuideConfig::default());
        assert_eq!(lines, vec!["speech: The painting is a landscape."]);
    }

    #[test]
    fn test_describe_commands() {
        let lines = describe(
            "#forward 200\nLet me see that.\n#doorpass\n#bogus foo",
            &GuideConfig::default(),
        );
        assert_eq!(lines[0], "commands: 4 line(s)");
        assert!(lines[1].ends_with("forward 200 mm"));
        assert!(lines[2].ends_with("say \"Let me see that.\""));
        assert!(lines[3].contains("says \"Could not pass through that doorway.\""));
        assert!(lines[4].ends_with("ignored"));
    }

    #[test]
    fn test_describe_expands_marker_ids() {
        let lines = describe("#pilottoaruco 3", &GuideConfig::default());
        assert!(lines[1].ends_with("pilot to ArucoMarker-3.a"));
    }

    #[test]
    fn test_guide_config_from_cli() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preamble.txt");
        fs::write(&path, "You are a test robot.").unwrap();

        let cli = Cli::parse_from([
            "museum-guide",
            "--greeting",
            "Hello there.",
            "--preamble",
            path.to_str().unwrap(),
        ]);
        let config = guide_config(&cli).unwrap();
        assert_eq!(config.greeting, "Hello there.");
        assert_eq!(config.preamble, "You are a test robot.");
    }

    #[test]
    fn test_missing_preamble_file() {
        let cli = Cli::parse_from(["museum-guide", "--preamble", "/nonexistent/preamble.txt"]);
        assert!(matches!(guide_config(&cli), Err(CliError::Io { .. })));
    }

    #[test]
    fn test_load_world_default() {
        let cli = Cli::parse_from(["museum-guide"]);
        let world = load_world(&cli).unwrap();
        assert!(world.objects.iter().any(|o| o.id == "ArucoMarker-1.a"));
    }
}
