// Sandcastle: search and social demand research
//
// This is the library root. The core (text, dedupe, cluster, intents,
// quality) is pure and synchronous; collectors and pipelines do the I/O
// around it.

pub mod cluster;
pub mod collector;
pub mod config;
pub mod dedupe;
pub mod doctor;
pub mod intents;
pub mod io;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod quality;
pub mod text;
