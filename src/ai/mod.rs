mod summarizer;

pub use summarizer::{Summarizer, SummaryService};
