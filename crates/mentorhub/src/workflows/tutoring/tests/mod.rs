mod common;

mod feedback;
