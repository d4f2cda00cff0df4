use log::{debug, info, warn};

use cortxfs_hist::error::{Error, FileError, Result};
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# cortxfs-hist 配置文件
# 命令行参数优先于这里的设置

[database]
# 性能数据库路径
path = "cortxfs_perfc.db"

[report]
# 单张图最多显示的 opid 数量，"NA" 表示不限制
rec_limit = "10"
# opid 下界
start_opid = 0
# 是否按执行时间升序排序
sort_by_time = false
# 输出图表 (SVG)
op_graph = "cortxfs_hist_graph.svg"
# 同时导出样本 CSV（可选）
# csv = "outputs/cortxfs_hist_samples.csv"

[chart]
width = 1280
height = 720
# x 轴 opid 标签字号
tick_font_size = 9
# 柱顶耗时标签字号
label_font_size = 9

[error]
# 缺少 init/finish 而被丢弃的样本
file = "logs/discarded.log"

[logging]
# 应用日志输出路径
file = "logs/cortxfs-hist.log"
# 日志级别: trace, debug, info, warn, error
level = "info"
"#;

/// 生成默认配置文件
pub fn handle_init(output_path: &str, force: bool) -> Result<()> {
    let path = Path::new(output_path);

    if path.exists() && !force {
        return Err(cortxfs_hist::file_error!(AlreadyExists {
            path: path.to_path_buf(),
        }));
    }

    if path.exists() {
        warn!("Overwriting existing configuration file: {output_path}");
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            debug!("Creating directory: {}", parent.display());
            fs::create_dir_all(parent).map_err(|e| {
                Error::File(FileError::CreateDirectoryFailed {
                    path: parent.to_path_buf(),
                    reason: e.to_string(),
                })
            })?;
        }
    }

    fs::write(path, DEFAULT_CONFIG).map_err(|e| {
        Error::File(FileError::WriteFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    })?;

    info!("Configuration file written: {output_path}");
    info!("Next steps:");
    info!("  1. Edit the configuration file: {output_path}");
    info!("  2. Validate it: cortxfs-hist validate -c {output_path}");
    info!("  3. Render a graph: cortxfs-hist -c {output_path} <fn_tag>");

    Ok(())
}
