pub(crate) mod page_cache;
