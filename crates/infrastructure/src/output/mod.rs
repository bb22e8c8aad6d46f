pub mod rule_file_writer;

pub use rule_file_writer::FileRuleWriter;
