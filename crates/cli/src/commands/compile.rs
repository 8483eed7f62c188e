use crate::OutputFormat;
use crate::util::{CliResult, colorize_xpath, dimmed};
use clap::Args;
use csspath_selector::{CacheStats, ExpressionType, XPathCompiler};
use serde::Serialize;
use std::fmt::Write;

#[derive(Args, Debug, Clone)]
pub struct CompileArgs {
    #[arg(value_name = "EXPR", required = true)]
    pub expressions: Vec<String>,
    #[arg(long = "type", value_name = "css|xpath", default_value = "css")]
    pub ty: ExpressionType,
    #[arg(long = "relative", help = "Anchor CSS branches at the context node (.//) instead of the root.")]
    pub relative: bool,
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CompiledExpression {
    pub expression: String,
    pub xpath: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CompileReport {
    pub results: Vec<CompiledExpression>,
    pub cache: CacheStats,
}

pub fn run(args: &CompileArgs) -> CliResult<String> {
    let report = compile_all(&args.expressions, args.ty, args.relative)?;
    let output = match args.format {
        OutputFormat::Text => render_text(&report),
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
    };
    Ok(output)
}

/// Compile every expression with one compiler so repeated branches hit the cache.
pub(crate) fn compile_all(expressions: &[String], ty: ExpressionType, relative: bool) -> CliResult<CompileReport> {
    let mut compiler = XPathCompiler::new();
    let mut results = Vec::with_capacity(expressions.len());
    for expression in expressions {
        let xpath = if relative {
            compiler.compile_relative(expression, ty)?
        } else {
            compiler.compile(expression, ty)?
        };
        results.push(CompiledExpression { expression: expression.clone(), xpath });
    }
    Ok(CompileReport { results, cache: compiler.cache().stats() })
}

fn render_text(report: &CompileReport) -> String {
    let mut output = String::new();
    if let [single] = report.results.as_slice() {
        let _ = writeln!(&mut output, "{}", colorize_xpath(&single.xpath));
    } else {
        for item in &report.results {
            let _ = writeln!(&mut output, "{} {}", dimmed(&format!("{}  =>", item.expression)), colorize_xpath(&item.xpath));
        }
    }
    output.trim_end().to_owned()
}
