// Tests for LCU access

#[cfg(test)]
pub(crate) mod test_helpers;
