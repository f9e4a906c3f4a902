mod cases;
mod cli;
mod properties;
