pub mod admin;
pub mod analyze_audio;
pub mod analyze_file;
pub mod analyze_text;
pub mod health;
pub mod report;
pub mod stream;
