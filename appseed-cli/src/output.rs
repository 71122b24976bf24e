//! Terminal rendering of creation events

use appseed::{Channel, EventSink};
use console::style;
use indicatif::ProgressBar;

/// Prints creation events above an active spinner
///
/// `verbose` messages are only shown when enabled. Warnings and errors go to
/// stderr, everything else to stdout.
#[derive(Debug, Clone)]
pub struct ConsoleSink {
    bar: ProgressBar,
    verbose: bool,
}

impl ConsoleSink {
    /// Create a sink printing through `bar`
    #[must_use]
    pub fn new(bar: ProgressBar, verbose: bool) -> Self {
        Self { bar, verbose }
    }

    /// Styled line for `message`, or `None` if it is filtered out
    #[must_use]
    pub fn render(&self, channel: Channel, message: &str) -> Option<String> {
        match channel {
            Channel::Verbose if !self.verbose => None,
            Channel::Verbose => Some(style(message).dim().to_string()),
            Channel::Log => Some(message.to_string()),
            Channel::Warn => Some(format!("{} {message}", style("warning:").yellow().bold())),
            Channel::Error => Some(format!("{} {message}", style("error:").red().bold())),
        }
    }
}

impl EventSink for ConsoleSink {
    fn emit(&self, channel: Channel, message: &str) {
        let Some(line) = self.render(channel, message) else {
            return;
        };
        // A hidden bar drops `println`, so print around it instead
        self.bar.suspend(|| match channel {
            Channel::Warn | Channel::Error => eprintln!("{line}"),
            Channel::Verbose | Channel::Log => println!("{line}"),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sink(verbose: bool) -> ConsoleSink {
        ConsoleSink::new(ProgressBar::hidden(), verbose)
    }

    #[test]
    fn test_verbose_is_filtered_unless_enabled() {
        assert!(sink(false).render(Channel::Verbose, "Copying assets.").is_none());
        let line = sink(true).render(Channel::Verbose, "Copying assets.").unwrap();
        assert!(line.contains("Copying assets."));
    }

    #[test]
    fn test_log_is_passed_through() {
        assert_eq!(
            sink(false).render(Channel::Log, "Creating a new project."),
            Some("Creating a new project.".to_string())
        );
    }

    #[test]
    fn test_warnings_and_errors_are_prefixed() {
        let warn = sink(false).render(Channel::Warn, "careful").unwrap();
        assert!(warn.contains("warning:") && warn.ends_with("careful"));
        let error = sink(false).render(Channel::Error, "broken").unwrap();
        assert!(error.contains("error:") && error.ends_with("broken"));
    }

    #[test]
    fn test_emit_on_hidden_bar_does_not_panic() {
        sink(true).emit(Channel::Log, "quiet");
    }
}
