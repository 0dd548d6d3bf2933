// 终端输出辅助：两列详情、项目符号、简单表格

use std::io::{self, Write};

/// `  Host ..................... value`
pub fn two_column(out: &mut dyn Write, label: &str, value: &str) -> io::Result<()> {
    writeln!(out, "  {:.<28} {}", format!("{label} "), value)
}

pub fn bullet(out: &mut dyn Write, text: &str) -> io::Result<()> {
    writeln!(out, "  • {text}")
}

/// 两列表格，列宽按字符数计算
pub fn table(out: &mut dyn Write, headers: [&str; 2], rows: &[(String, String)]) -> io::Result<()> {
    let first_width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .chain(std::iter::once(headers[0].chars().count()))
        .max()
        .unwrap_or(0);
    let second_width = rows
        .iter()
        .map(|(_, value)| value.chars().count())
        .chain(std::iter::once(headers[1].chars().count()))
        .max()
        .unwrap_or(0);

    let border = format!(
        "+-{}-+-{}-+",
        "-".repeat(first_width),
        "-".repeat(second_width)
    );
    let row = |left: &str, right: &str| {
        format!(
            "| {left}{} | {right}{} |",
            " ".repeat(first_width - left.chars().count()),
            " ".repeat(second_width - right.chars().count())
        )
    };

    writeln!(out, "{border}")?;
    writeln!(out, "{}", row(headers[0], headers[1]))?;
    writeln!(out, "{border}")?;
    for (left, right) in rows {
        writeln!(out, "{}", row(left, right))?;
    }
    writeln!(out, "{border}")
}

/// 写入 env 时的提示：`DB_*` 字段显示值（密码除外），其余只显示键名
pub fn describe_variable(key: &str, value: &str) -> String {
    if key == "DB_PASSWORD" {
        format!("设置 {key}（已隐藏）")
    } else if key.starts_with("DB_") {
        format!("设置 {key}={value}")
    } else {
        format!("设置 {key}")
    }
}
