pub mod cec;
