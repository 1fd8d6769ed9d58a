pub mod copy;
pub mod notification;
pub mod retention;

#[cfg(test)]
pub(crate) mod test_support;
