use tempfile::tempdir;

use repo2pdf::sphinx::patch_substitution_extensions;

const FRAGILE: &str = "version = substitution_defs[\"version\"].astext()";
const PATCHED: &str = "version = substitution_defs.get(\"version\", \"unknown\")";

#[tokio::test]
async fn rewrites_the_fragile_version_lookup() {
    let root = tempdir().expect("tempdir");
    let ext_dir = root.path().join("devel-common/src/sphinx_exts");
    tokio::fs::create_dir_all(&ext_dir).await.expect("mkdir");

    let file = ext_dir.join("substitution_extensions.py");
    let contents = format!("def setup(app):\n    {FRAGILE}\n    return version\n");
    tokio::fs::write(&file, &contents).await.expect("write");

    patch_substitution_extensions(root.path())
        .await
        .expect("patch should succeed");

    let patched = tokio::fs::read_to_string(&file).await.expect("read back");
    assert!(patched.contains(PATCHED));
    assert!(!patched.contains(FRAGILE));
}

#[tokio::test]
async fn missing_extension_directory_is_silently_skipped() {
    let root = tempdir().expect("tempdir");

    patch_substitution_extensions(root.path())
        .await
        .expect("absent dir is not an error");
}

#[tokio::test]
async fn files_without_the_fragile_expression_are_left_alone() {
    let root = tempdir().expect("tempdir");
    let ext_dir = root.path().join("devel-common/src/sphinx_exts");
    tokio::fs::create_dir_all(&ext_dir).await.expect("mkdir");

    let file = ext_dir.join("substitution_extensions.py");
    tokio::fs::write(&file, "def setup(app):\n    pass\n")
        .await
        .expect("write");

    patch_substitution_extensions(root.path())
        .await
        .expect("patch should succeed");

    let contents = tokio::fs::read_to_string(&file).await.expect("read back");
    assert_eq!(contents, "def setup(app):\n    pass\n");
}
