//! Client for the cluster scheduler.
//!
//! [`SchedulerClient`] is the seam the tracker talks to. [`SlurmClient`]
//! implements it by shelling out to the Slurm command-line tools and parsing
//! their text output in [`parse`].

pub mod client;
pub mod error;
pub mod parse;
pub mod slurm;

pub use client::{HistoryInfo, LiveJobInfo, SchedulerClient};
pub use error::SchedulerError;
pub use slurm::{SlurmClient, SlurmCommands};
