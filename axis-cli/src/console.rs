//! Terminal adapters for the core's platform ports.

use axis_core::{AxisError, Clipboard, Navigator, Route};

/// Terminals have no router; announce where the app would go.
pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn navigate(&self, route: Route) {
        eprintln!("→ {}", route.path());
    }
}

/// No system clipboard dependency; print the text so it can be copied by hand.
pub struct StdoutClipboard;

impl Clipboard for StdoutClipboard {
    fn write_text(&self, text: &str) -> Result<(), AxisError> {
        println!("{}", text);
        Ok(())
    }
}
