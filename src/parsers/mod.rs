pub mod results_csv;

pub use results_csv::{read_results, read_results_file};
