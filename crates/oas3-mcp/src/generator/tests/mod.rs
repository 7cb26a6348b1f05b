mod arguments;
mod support;
