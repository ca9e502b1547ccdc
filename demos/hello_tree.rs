use vfs_tree::{FsBackend, TreeFS};

fn main() -> anyhow::Result<()> {
    // empty file system: only `/` exists and it is the CWD
    let mut fs = TreeFS::new();

    // creates `/docs` and `/docs/drafts` in one go
    fs.mkdir("/docs/drafts", true)?;

    // change CWD to `/docs`
    fs.cd("docs")?;

    // `first.txt` is created in the CWD because the path is relative
    fs.mkfile("first.txt", false)?;
    fs.write("first.txt", b"Hello", false)?;

    // `force` creates `/second.txt` on the fly
    fs.write("/second.txt", b"World", true)?;

    // back to `/`
    fs.cd("..")?;

    let first = fs.read("/docs/first.txt")?;
    let second = fs.read("/second.txt")?;
    println!(
        "{}, {}!",
        String::from_utf8(first)?,
        String::from_utf8(second)?
    );

    // move the file into the directory, then fold `/docs/drafts` back into `/docs`
    fs.mv("/second.txt", "/docs/drafts", false)?;
    fs.merge_dir("/docs/drafts", "/docs")?;

    for path in fs.tree(None)? {
        println!("{path}");
    }

    // the root can never be removed
    if let Err(err) = fs.rm("/", true) {
        println!("{err}");
    }

    Ok(())
}
