mod mgf;
mod table;

pub use mgf::{
    read_mgf,
    read_mgf_path,
};
pub use table::{
    read_flat_table,
    read_flat_table_path,
};
