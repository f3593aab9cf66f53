mod pipeline;
mod preparer;
mod support;
