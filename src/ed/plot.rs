//! # 格林函数图表
//!
//! 使用 `plotters` 绘制 Matsubara 轴上的 Re G 与 Im G。
//!
//! ## 依赖关系
//! - 被 `commands/gf.rs` 调用
//! - 使用 `ed/greens.rs` 的 GreensPoint
//! - 使用 `plotters` 渲染图表（PNG/SVG）

use crate::ed::greens::GreensPoint;
use crate::error::{EdkitError, Result};

use plotters::prelude::*;
use std::path::Path;

/// 生成格林函数图表
pub fn generate_greens_plot(
    points: &[GreensPoint],
    output_path: &Path,
    title: &str,
    width: u32,
    height: u32,
    use_svg: bool,
) -> Result<()> {
    if use_svg {
        let root = SVGBackend::new(output_path, (width, height)).into_drawing_area();
        draw_greens_chart(&root, points, title)?;
        root.present()
            .map_err(|e| EdkitError::Other(e.to_string()))?;
    } else {
        let root = BitMapBackend::new(output_path, (width, height)).into_drawing_area();
        draw_greens_chart(&root, points, title)?;
        root.present()
            .map_err(|e| EdkitError::Other(e.to_string()))?;
    }
    Ok(())
}

/// 绘制图表的核心逻辑
fn draw_greens_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    points: &[GreensPoint],
    title: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| EdkitError::Other(format!("{:?}", e)))?;

    let x_max = points.last().map(|p| p.omega).unwrap_or(1.0).max(1e-6);
    let (y_min, y_max) = points
        .iter()
        .flat_map(|p| [p.value.re, p.value.im])
        .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let pad = 0.1 * (y_max - y_min).max(1e-3);

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..x_max * 1.02, (y_min - pad)..(y_max + pad))
        .map_err(|e| EdkitError::Other(format!("{:?}", e)))?;

    chart
        .configure_mesh()
        .x_desc("ωₙ")
        .y_desc("G(iωₙ)")
        .x_label_style(("sans-serif", 16))
        .y_label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 18))
        .draw()
        .map_err(|e| EdkitError::Other(format!("{:?}", e)))?;

    let re_color = RGBColor(0, 102, 204);
    let im_color = RGBColor(204, 51, 0);

    chart
        .draw_series(LineSeries::new(
            points.iter().map(|p| (p.omega, p.value.re)),
            re_color.stroke_width(2),
        ))
        .map_err(|e| EdkitError::Other(format!("{:?}", e)))?
        .label("Re G")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], re_color));

    chart
        .draw_series(
            points
                .iter()
                .map(|p| Circle::new((p.omega, p.value.im), 3, im_color.filled())),
        )
        .map_err(|e| EdkitError::Other(format!("{:?}", e)))?
        .label("Im G")
        .legend(move |(x, y)| Circle::new((x + 10, y), 3, im_color.filled()));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(|e| EdkitError::Other(format!("{:?}", e)))?;

    Ok(())
}
