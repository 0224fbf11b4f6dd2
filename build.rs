use vergen_gitcl::{Emitter, Gitcl};

// Embeds git branch, SHA and dirty flag for `exhibit::version_string`.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let gitcl = Gitcl::builder().branch(true).sha(true).dirty(true).build();

    Emitter::default().add_instructions(&gitcl)?.emit()?;

    Ok(())
}
