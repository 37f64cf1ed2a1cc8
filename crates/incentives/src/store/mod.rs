pub(crate) mod pool_store;
