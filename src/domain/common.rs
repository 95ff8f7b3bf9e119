/// Supplies a one-line label for notifications and logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}
