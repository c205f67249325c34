//! Output functions for build log formatting

use super::context::UiContext;
use console::style;

/// Announce a pipeline stage: `--- Decoding buildpack.toml file`
pub fn stage(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        println!("{} {}", style("---").cyan().bold(), style(message).bold());
    } else {
        println!("--- {}", message);
    }
}

/// Final success line
pub fn success(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        println!("{} {}", style("---").green().bold(), style(message).green());
    } else {
        println!("--- {}", message);
    }
}

/// Error report on stderr, with an optional hint
pub fn failure(message: &str, hint: Option<&str>) {
    eprintln!("{} {}", style("Error:").red().bold(), message);
    if let Some(hint) = hint {
        eprintln!("{} {}", style("Hint:").yellow(), hint);
    }
}
