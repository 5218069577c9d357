pub mod millionaire;
