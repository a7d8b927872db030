pub mod narration;
pub mod report;
pub mod shared;

#[cfg(test)]
pub(crate) mod testing;
