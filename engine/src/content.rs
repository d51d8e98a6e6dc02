/// Built-in weapon catalog, embedded so the engine works with no files
/// on disk. Callers may substitute their own catalog JSON.
pub fn builtin_weapons() -> &'static str {
    include_str!("../content/weapons/basic.json")
}
