pub(crate) mod check_config;
pub(crate) mod init_db;
pub(crate) mod serve;
