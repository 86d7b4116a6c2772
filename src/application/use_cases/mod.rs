pub mod evaluate;
pub mod phrases;
pub mod prompts;
pub mod shaping;

#[cfg(test)]
pub(crate) mod test_support;
