use colored::*;
use dialoguer::{theme::ColorfulTheme, Confirm};
use log::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeStyle {
    Success,
    Failure,
}

/// Everything a flow needs from the user-facing side: notifications,
/// confirmation of destructive actions, and returning to the root view.
pub trait Surface {
    fn notify(&self, style: NoticeStyle, title: &str, message: &str);

    /// Asks before a destructive action; `action` labels the affirmative choice.
    fn confirm(&self, title: &str, message: &str, action: &str) -> bool;

    fn pop_to_root(&self);
}

pub struct TerminalSurface {
    assume_yes: bool,
}

impl TerminalSurface {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Surface for TerminalSurface {
    fn notify(&self, style: NoticeStyle, title: &str, message: &str) {
        match style {
            NoticeStyle::Success => {
                println!("{} {}", "✓".green(), title.bold());
                if !message.is_empty() {
                    println!("  {}", message);
                }
            }
            NoticeStyle::Failure => {
                eprintln!("{} {}", "✗".red(), title.red().bold());
                if !message.is_empty() {
                    eprintln!("  {}", message);
                }
            }
        }
    }

    fn confirm(&self, title: &str, message: &str, action: &str) -> bool {
        if self.assume_yes {
            debug!("Confirmation '{}' answered by --yes", title);
            return true;
        }

        println!("{}", title.red().bold());
        let answer = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("{} ({})", message, action.red()))
            .default(false)
            .interact();

        match answer {
            Ok(confirmed) => confirmed,
            Err(e) => {
                warn!("Confirmation prompt failed, treating as declined: {}", e);
                false
            }
        }
    }

    fn pop_to_root(&self) {
        debug!("Returning to root view");
    }
}

#[cfg(test)]
pub mod fake {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Notice {
        pub style: NoticeStyle,
        pub title: String,
        pub message: String,
    }

    /// Records notices and navigation; answers confirmations with a fixed value.
    pub struct FakeSurface {
        answer: bool,
        notices: RefCell<Vec<Notice>>,
        confirmations: RefCell<Vec<String>>,
        popped: Cell<usize>,
    }

    impl FakeSurface {
        pub fn new() -> Self {
            Self::answering(true)
        }

        pub fn answering(answer: bool) -> Self {
            Self {
                answer,
                notices: RefCell::new(Vec::new()),
                confirmations: RefCell::new(Vec::new()),
                popped: Cell::new(0),
            }
        }

        pub fn notices(&self) -> Vec<Notice> {
            self.notices.borrow().clone()
        }

        pub fn confirmations(&self) -> Vec<String> {
            self.confirmations.borrow().clone()
        }

        pub fn popped(&self) -> usize {
            self.popped.get()
        }
    }

    impl Surface for FakeSurface {
        fn notify(&self, style: NoticeStyle, title: &str, message: &str) {
            self.notices.borrow_mut().push(Notice {
                style,
                title: title.to_string(),
                message: message.to_string(),
            });
        }

        fn confirm(&self, _title: &str, message: &str, _action: &str) -> bool {
            self.confirmations.borrow_mut().push(message.to_string());
            self.answer
        }

        fn pop_to_root(&self) {
            self.popped.set(self.popped.get() + 1);
        }
    }
}
