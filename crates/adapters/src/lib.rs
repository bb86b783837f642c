// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! nv-adapters: boundaries to the outside world.
//!
//! Everything that shells out lives here: the timeout-scoped subprocess
//! runner, git plumbing, the agent subprocess adapter, and desktop
//! notifications. Upper layers depend on the traits, tests on the fakes.

pub mod agent;
pub mod git;
pub mod notify;
pub mod subprocess;

pub use agent::{AgentAdapter, AgentError, AgentExit, AgentLaunch, AgentSpawnSpec, CliAgentAdapter};
pub use git::GitError;
pub use notify::{DesktopNotifier, NoopNotifier, NotifyAdapter};
pub use subprocess::{run_with_timeout, SubprocessError};

#[cfg(any(test, feature = "test-support"))]
pub use agent::FakeAgentAdapter;
