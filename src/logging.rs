//! Log output for the page build.
//!
//! The browser has neither a terminal nor a wall clock reachable from
//! `std`, so events are written plain and without timestamps. The writer is
//! the console in a page and anything `MakeWriter` in tests.

use tracing::Subscriber;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

pub fn page_layer<S, W>(writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span> + 'static,
    W: for<'writer> MakeWriter<'writer> + 'static,
{
    tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(writer)
        .with_filter(LevelFilter::INFO)
}
