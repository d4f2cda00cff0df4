//! 公共常量
//! 提供：
//! - 合法日志级别常量 LOG_LEVELS
//! - entity_states 表结构与查询语句

/// 合法的日志级别（统一来源）
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// 性能数据表名
pub const ENTITY_STATES_TABLE: &str = "entity_states";

/// 默认性能数据库路径
pub const DEFAULT_DB_PATH: &str = "cortxfs_perfc.db";

/// 默认输出图表路径
pub const DEFAULT_OP_GRAPH: &str = "cortxfs_hist_graph.svg";

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "cortxfs_hist.toml";

/// 默认最大 opid 数量
pub const DEFAULT_REC_LIMIT: u32 = 10;

/// 表示不限制记录数的字面值
pub const NO_LIMIT: &str = "NA";

/// entity_states 表列定义（仅测试夹具与文档使用，本工具不建表）
pub const ENTITY_STATES_COLUMNS: &str = "
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    pid INTEGER,
    time INTEGER NOT NULL,
    tsdb_mod TEXT,
    fn_tag TEXT NOT NULL,
    entity_type TEXT,
    opid INTEGER NOT NULL,
    state_type TEXT NOT NULL
";

/// 按函数标签选出 opid：按首条匹配记录的插入顺序排序
///
/// ?2 为 NULL 时不设 opid 下界，LIMIT -1 表示不限制
pub const SELECT_OPIDS_SQL: &str = "SELECT opid FROM entity_states \
     WHERE fn_tag LIKE ?1 AND (?2 IS NULL OR opid >= ?2) \
     GROUP BY opid ORDER BY MIN(id) ASC LIMIT ?3";

/// 读取某个 opid 的全部状态记录
pub const SELECT_STATES_SQL: &str = "SELECT id, pid, time, tsdb_mod, fn_tag, entity_type, opid, state_type \
     FROM entity_states WHERE opid = ?1 ORDER BY id ASC";

/// 检查表是否存在
pub const TABLE_EXISTS_SQL: &str =
    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1";

/// 生成 CREATE TABLE SQL 语句
pub fn create_table_sql(table_name: &str) -> String {
    format!("CREATE TABLE IF NOT EXISTS {table_name} ({ENTITY_STATES_COLUMNS});")
}

/// 生成 INSERT SQL 语句
pub fn insert_sql(table_name: &str) -> String {
    format!(
        "INSERT INTO {table_name} (pid, time, tsdb_mod, fn_tag, entity_type, opid, state_type) \
         VALUES (?, ?, ?, ?, ?, ?, ?);"
    )
}
