pub mod in_memory;
pub mod renderer;
pub mod tax;
