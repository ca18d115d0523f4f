pub mod albums;
pub mod media_delete;
pub mod media_edit;
pub mod media_get;
pub mod media_list;
pub mod media_trim;
pub mod media_upload;
