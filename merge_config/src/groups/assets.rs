crate::config_group!({

    /// Canonical name of the data asset.  Parts are looked up at `<data_asset>.part<i>`, and
    /// requests ending with this name are served from the merged buffer.
    ///
    /// Use the environment variable `PARTMERGE_ASSETS_DATA_ASSET` to set this value.
    ref data_asset: String = "Build/WebGL.data".to_string();

    /// Number of parts the data asset is split into.
    ///
    /// Use the environment variable `PARTMERGE_ASSETS_DATA_PART_COUNT` to set this value.
    ref data_part_count: usize = 3;

    /// Canonical name of the code asset.
    ///
    /// Use the environment variable `PARTMERGE_ASSETS_CODE_ASSET` to set this value.
    ref code_asset: String = "Build/WebGL.wasm".to_string();

    /// Number of parts the code asset is split into.
    ///
    /// Use the environment variable `PARTMERGE_ASSETS_CODE_PART_COUNT` to set this value.
    ref code_part_count: usize = 2;

    /// Index of the first part.  Parts are numbered contiguously from here.
    ///
    /// Use the environment variable `PARTMERGE_ASSETS_FIRST_PART_INDEX` to set this value.
    ref first_part_index: usize = 1;

    /// Digits in the zero-padded mirror name of a part, e.g. 2 gives `.part07`.
    ///
    /// Use the environment variable `PARTMERGE_ASSETS_PART_INDEX_WIDTH` to set this value.
    ref part_index_width: usize = 2;
});
