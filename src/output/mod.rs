pub mod formatter;
pub mod numbers;

pub use formatter::{
    format_age, format_initiative_detail, format_money, format_ranked_table, format_score,
    format_tsv, should_use_colors,
};
pub use numbers::{
    format_number_for_display, is_valid_display_number, parse_display_number, to_fixed,
};
