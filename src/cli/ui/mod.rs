pub mod forecast_table;
pub mod table_renderer;
