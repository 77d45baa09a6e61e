pub(crate) mod browse;
pub(crate) mod history;
pub(crate) mod serve;
