mod classifier;
mod common;
mod feed;
