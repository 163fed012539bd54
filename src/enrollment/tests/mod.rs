mod common;
mod lifecycle;
