pub(crate) mod station;
