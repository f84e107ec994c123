//! # Repasar
//!
//! Headless walkthrough runner for a quiz/exam web application. Repasar seeds
//! the app's client-side storage with a demo-mode flag and a mock question
//! set, then walks a fixed sequence of navigation milestones (admin dashboard,
//! metadata management, AI question creator, student dashboard, exam library,
//! test mode, practice mode) and captures a full-page screenshot at each one.
//!
//! The output is a directory of named PNG artifacts plus a [`RunReport`] of
//! per-step outcomes; it exists for visual regression and manual verification,
//! not assertion-based testing. Missing controls and per-step timeouts are
//! logged and recorded, never fatal; only browser launch and the initial
//! navigation abort a run.
//!
//! Real browser control (Chromium over CDP) is behind the `browser` feature;
//! without it a mock page with a scriptable UI surface backs the unit tests.
//!
//! ```no_run
//! use repasar::{Browser, BrowserConfig, Walkthrough, WalkthroughConfig};
//!
//! # async fn demo() -> repasar::RepasarResult<()> {
//! let browser = Browser::launch(BrowserConfig::default()).await?;
//! let mut page = browser.new_page().await?;
//!
//! let walkthrough = Walkthrough::new(WalkthroughConfig::default());
//! let report = walkthrough.run(&mut page).await;
//! browser.close().await?;
//!
//! println!("{}", report?.summary());
//! # Ok(())
//! # }
//! ```

pub mod browser;
pub mod fixture;
pub mod locator;
pub mod milestone;
pub mod report;
pub mod result;
pub mod wait;
pub mod walkthrough;

pub use browser::{Browser, BrowserConfig, Page};
pub use fixture::{default_questions, questions_json, MockQuestion, DEMO_MODE_KEY, QUESTIONS_KEY};
pub use locator::Selector;
pub use milestone::Milestone;
pub use report::{RunReport, StepOutcome, StepStatus};
pub use result::{RepasarError, RepasarResult};
pub use wait::{poll_until, WaitOptions, WaitResult};
pub use walkthrough::{Walkthrough, WalkthroughConfig};
