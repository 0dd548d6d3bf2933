//! 文件系统抽象
//!
//! 编辑器只依赖这四个操作，测试中可以替换为内存实现或注入故障。

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// 编辑器所需的最小文件系统接口
pub trait FileSystem: Send + Sync {
    /// 路径是否指向一个存在的文件
    fn exists(&self, path: &Path) -> bool;

    /// 读取整个文件为 UTF-8 字符串
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// 用 `contents` 覆盖写入文件
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;

    /// 复制文件，覆盖目标
    fn copy(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// 基于 `std::fs` 的实现
///
/// 写入先落到目标旁的临时文件，再 rename 覆盖目标，
/// 失败时不会留下被截断的文件。符号链接会写到真实目标，
/// 已有文件保留原权限，新建文件在 Unix 上为 0o600。
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFileSystem;

impl FileSystem for StdFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        let (target, permissions) = match fs::canonicalize(path) {
            Ok(real) => {
                let permissions = fs::metadata(&real)?.permissions();
                (real, Some(permissions))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => (path.to_path_buf(), None),
            Err(e) => return Err(e),
        };

        let tmp_path = temp_sibling(&target);
        let result = write_temp(&tmp_path, contents, permissions)
            .and_then(|()| fs::rename(&tmp_path, &target));
        if result.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        result
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::copy(from, to).map(|_| ())
    }
}

/// `<path>.tmp`，与目标位于同一目录，保证 rename 不跨文件系统
fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

fn write_temp(
    tmp_path: &Path,
    contents: &str,
    permissions: Option<fs::Permissions>,
) -> io::Result<()> {
    let mut file = open_private(tmp_path)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()?;
    drop(file);

    match permissions {
        Some(permissions) => fs::set_permissions(tmp_path, permissions),
        None => set_private_permissions(tmp_path),
    }
}

/// 创建时即为 0o600，避免临时文件短暂可被其他用户读取
#[cfg(unix)]
fn open_private(path: &Path) -> io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> io::Result<fs::File> {
    fs::File::create(path)
}

/// 设置文件权限（Unix 平台 0o600）
#[cfg(unix)]
fn set_private_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn set_private_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}

/// 测试用的内存文件系统，支持注入写入/复制失败
#[cfg(test)]
pub(crate) mod memory {
    use super::FileSystem;
    use std::collections::HashMap;
    use std::io;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    #[derive(Default)]
    pub(crate) struct MemoryFileSystem {
        pub(crate) files: Mutex<HashMap<PathBuf, String>>,
        pub(crate) writes: Mutex<Vec<PathBuf>>,
        /// 写入内容包含该片段时返回错误
        pub(crate) fail_write_containing: Option<String>,
        pub(crate) fail_copy: bool,
    }

    impl MemoryFileSystem {
        pub(crate) fn with_file(path: impl Into<PathBuf>, content: &str) -> Self {
            let fs = Self::default();
            fs.put(path, content);
            fs
        }

        pub(crate) fn put(&self, path: impl Into<PathBuf>, content: &str) {
            self.files
                .lock()
                .unwrap()
                .insert(path.into(), content.to_string());
        }

        pub(crate) fn content(&self, path: &Path) -> Option<String> {
            self.files.lock().unwrap().get(path).cloned()
        }

        pub(crate) fn write_count(&self) -> usize {
            self.writes.lock().unwrap().len()
        }
    }

    impl FileSystem for MemoryFileSystem {
        fn exists(&self, path: &Path) -> bool {
            self.files.lock().unwrap().contains_key(path)
        }

        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            self.content(path)
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
        }

        fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
            if let Some(marker) = &self.fail_write_containing {
                if contents.contains(marker.as_str()) {
                    return Err(io::Error::other("simulated write failure"));
                }
            }
            self.writes.lock().unwrap().push(path.to_path_buf());
            self.put(path, contents);
            Ok(())
        }

        fn copy(&self, from: &Path, to: &Path) -> io::Result<()> {
            if self.fail_copy {
                return Err(io::Error::other("simulated copy failure"));
            }
            let content = self.read_to_string(from)?;
            self.put(to, &content);
            Ok(())
        }
    }
}
