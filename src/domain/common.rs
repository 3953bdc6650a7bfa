/// Short human-readable form used in log fields and shell messages.
pub trait Displayable {
    fn display_label(&self) -> String;
}
