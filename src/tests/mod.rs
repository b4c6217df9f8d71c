mod depth;
mod staging;
