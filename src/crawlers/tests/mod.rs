pub(crate) mod fake_driver;
