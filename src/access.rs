pub mod pagination;
pub mod tours;
pub mod tour_cursor;
