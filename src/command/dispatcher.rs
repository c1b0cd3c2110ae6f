//! Command dispatcher - maps request lines to actions

use crate::action::{ActionProvider, ActionResult};
use pcremote_shared::{Command, Response};
use tracing::{debug, warn};

/// Routes decoded commands to the action provider
pub struct CommandDispatcher {
    actions: ActionProvider,
}

impl CommandDispatcher {
    /// Create a new command dispatcher
    pub fn new(actions: ActionProvider) -> Self {
        Self { actions }
    }

    /// Handle one request line and produce its response
    pub async fn dispatch(&self, raw: &str) -> Response {
        let command = Command::parse(raw);
        debug!("Dispatching command: {}", command);

        let result = match command {
            Command::Shutdown => self.actions.shutdown().await,
            Command::Sleep => self.actions.sleep().await,
            Command::Lock => self.actions.lock().await,
            Command::Unknown(text) => {
                warn!("Unknown command: {}", text);
                return Response::unknown(&text);
            }
        };

        into_response(result)
    }
}

fn into_response(result: ActionResult) -> Response {
    match result {
        Ok(message) => Response::success(message),
        Err(e) => Response::error(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::testing::{Outcome, ScriptedRunner};
    use crate::platform::Platform;
    use pcremote_shared::Status;
    use std::sync::Arc;

    fn dispatcher(platform: Platform, runner: &Arc<ScriptedRunner>) -> CommandDispatcher {
        CommandDispatcher::new(ActionProvider::new(platform, runner.clone()))
    }

    #[tokio::test]
    async fn test_casings_resolve_to_same_action() {
        let runner = Arc::new(ScriptedRunner::new().with("shutdown", Outcome::Succeed));
        let dispatcher = dispatcher(Platform::Linux, &runner);

        for raw in ["SHUTDOWN", "shutdown", "Shutdown", "SHUTDOWN ", "\tshutdown\r"] {
            let resp = dispatcher.dispatch(raw).await;
            assert_eq!(resp, Response::success("System will shutdown in 1 minute"));
        }
        assert_eq!(runner.calls(), vec!["shutdown -h +1"; 5]);
    }

    #[tokio::test]
    async fn test_unknown_command_echoes_trimmed_text() {
        let runner = Arc::new(ScriptedRunner::new());
        let dispatcher = dispatcher(Platform::Linux, &runner);

        let resp = dispatcher.dispatch("  Reboot please \n").await;
        assert_eq!(resp.status, Status::Error);
        assert_eq!(resp.message, "Unknown command: Reboot please");

        let resp = dispatcher.dispatch("").await;
        assert_eq!(resp.message, "Unknown command: ");
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_action_errors_pass_through() {
        let runner = Arc::new(ScriptedRunner::new());
        let dispatcher = dispatcher(Platform::Linux, &runner);

        let resp = dispatcher.dispatch("lock").await;
        assert_eq!(resp, Response::error("No suitable lock command found"));

        let resp = dispatcher.dispatch("sleep").await;
        assert_eq!(resp, Response::error("Failed to execute sleep command"));
    }

    #[tokio::test]
    async fn test_macos_lock_example() {
        let runner = Arc::new(ScriptedRunner::new().with(
            "/System/Library/CoreServices/Menu Extras/User.menu/Contents/Resources/CGSession",
            Outcome::Succeed,
        ));
        let resp = dispatcher(Platform::MacOs, &runner).dispatch("lock\n").await;
        let line = pcremote_shared::codec::encode(&resp).expect("encode failed");
        assert_eq!(
            &line[..],
            b"{\"status\": \"SUCCESS\", \"message\": \"System locked\"}\n"
        );
    }

    #[tokio::test]
    async fn test_unsupported_platform() {
        let runner = Arc::new(ScriptedRunner::new());
        let dispatcher = dispatcher(Platform::Unsupported("sunos".into()), &runner);
        assert_eq!(
            dispatcher.dispatch("SLEEP").await,
            Response::error("Sleep not supported on sunos")
        );
    }
}
