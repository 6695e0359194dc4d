//! PNG chart rendering for the aggregate views.
//!
//! Charts are drawn with imageproc on a white canvas. Titles, axis labels and
//! tick values use the bundled DejaVu Sans font. Pie slices take a fixed color
//! per species so the legend reads the same across datasets.

use std::f64::consts::PI;
use std::fmt;
use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_line_segment_mut, draw_polygon_mut,
    draw_text_mut, text_size,
};
use imageproc::point::Point;
use imageproc::rect::Rect;
use rusttype::{Font, Scale};
use tracing::{info, warn};

use super::aggregates::{
    Frequency, pets_per_person, pets_vs_occupations, popular_pet_names, species_distribution,
};
use crate::errors::ChartRenderError;
use crate::models::{Dataset, Species};

const FONT_BYTES: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

/// Number of names shown in the popular names chart.
pub const TOP_PET_NAMES: usize = 10;

const TITLE_SIZE: f32 = 24.0;
const LABEL_SIZE: f32 = 16.0;
const TICK_SIZE: f32 = 13.0;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const GRID: Rgb<u8> = Rgb([220, 220, 220]);
const SKY_BLUE: Rgb<u8> = Rgb([135, 206, 235]);
const LIGHT_GREEN: Rgb<u8> = Rgb([144, 238, 144]);
const MARKER: Rgb<u8> = Rgb([31, 119, 180]);

/// The four charts of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    PetsPerPerson,
    SpeciesDistribution,
    PetsVsOccupations,
    PopularPetNames,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::PetsPerPerson,
        ChartKind::SpeciesDistribution,
        ChartKind::PetsVsOccupations,
        ChartKind::PopularPetNames,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            ChartKind::PetsPerPerson => "pets_per_person.png",
            ChartKind::SpeciesDistribution => "pet_species_pie.png",
            ChartKind::PetsVsOccupations => "pets_vs_occupations.png",
            ChartKind::PopularPetNames => "popular_pet_names.png",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::PetsPerPerson => "Number of Pets per Person",
            ChartKind::SpeciesDistribution => "Distribution of Pet Species",
            ChartKind::PetsVsOccupations => "Relationship between Number of Pets and Occupations",
            ChartKind::PopularPetNames => "Most Common Pet Names",
        }
    }

    pub fn x_label(&self) -> Option<&'static str> {
        match self {
            ChartKind::PetsPerPerson => Some("Person Name"),
            ChartKind::SpeciesDistribution => None,
            ChartKind::PetsVsOccupations => Some("Number of Occupations"),
            ChartKind::PopularPetNames => Some("Pet Name"),
        }
    }

    pub fn y_label(&self) -> Option<&'static str> {
        match self {
            ChartKind::PetsPerPerson | ChartKind::PetsVsOccupations => Some("Number of Pets"),
            ChartKind::SpeciesDistribution => None,
            ChartKind::PopularPetNames => Some("Count"),
        }
    }

    /// Canvas size in pixels.
    fn size(&self) -> (u32, u32) {
        match self {
            ChartKind::PetsPerPerson => (1200, 600),
            ChartKind::SpeciesDistribution => (800, 800),
            ChartKind::PetsVsOccupations => (1000, 600),
            ChartKind::PopularPetNames => (1000, 600),
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Result of rendering one chart.
#[derive(Debug)]
pub struct ChartOutcome {
    pub chart: ChartKind,
    pub result: Result<PathBuf, ChartRenderError>,
}

/// Per-chart outcomes of a report run.
#[derive(Debug, Default)]
pub struct ChartReport {
    pub outcomes: Vec<ChartOutcome>,
}

impl ChartReport {
    pub fn rendered(&self) -> impl Iterator<Item = &Path> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().ok().map(PathBuf::as_path))
    }

    pub fn failures(&self) -> impl Iterator<Item = (ChartKind, &ChartRenderError)> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().err().map(|err| (outcome.chart, err)))
    }

    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.result.is_ok())
    }
}

/// Renders every chart into `out_dir`. A failing chart is logged and recorded;
/// the remaining charts are still rendered.
pub fn render_report(dataset: &Dataset, out_dir: &Path) -> ChartReport {
    let mut report = ChartReport::default();

    for chart in ChartKind::ALL {
        let path = out_dir.join(chart.file_name());
        let result = render_chart(chart, dataset, &path).map(|()| path);

        match &result {
            Ok(path) => info!(chart = %chart, path = %path.display(), "Chart rendered"),
            Err(err) => warn!(chart = %chart, error = %err, "Chart failed"),
        }
        report.outcomes.push(ChartOutcome { chart, result });
    }

    report
}

/// Renders a single chart to `path`.
pub fn render_chart(
    chart: ChartKind,
    dataset: &Dataset,
    path: &Path,
) -> Result<(), ChartRenderError> {
    let font = load_font()?;
    let (width, height) = chart.size();
    let mut canvas = Canvas::new(width, height, &font);

    match chart {
        ChartKind::PetsPerPerson => {
            let bars: Vec<(String, f64)> = pets_per_person(&dataset.persons, &dataset.pets)
                .into_iter()
                .map(|c| (c.full_name, c.pet_count as f64))
                .collect();
            bar_chart(&mut canvas, chart, &bars, SKY_BLUE)?;
        }
        ChartKind::SpeciesDistribution => {
            pie_chart(&mut canvas, chart, &species_distribution(&dataset.pets))?;
        }
        ChartKind::PetsVsOccupations => {
            let points: Vec<(f64, f64)> =
                pets_vs_occupations(&dataset.pets, &dataset.occupations)
                    .iter()
                    .map(|a| (a.occupation_count as f64, a.pet_count as f64))
                    .collect();
            scatter_chart(&mut canvas, chart, &points)?;
        }
        ChartKind::PopularPetNames => {
            let bars: Vec<(String, f64)> = popular_pet_names(&dataset.pets, TOP_PET_NAMES)
                .into_iter()
                .map(|f| (f.value, f.count as f64))
                .collect();
            bar_chart(&mut canvas, chart, &bars, LIGHT_GREEN)?;
        }
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    canvas.image.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

fn load_font() -> Result<Font<'static>, ChartRenderError> {
    Font::try_from_bytes(FONT_BYTES).ok_or(ChartRenderError::Font)
}

/// Slice color of each species, independent of its rank.
pub fn species_color(species: Species) -> Rgb<u8> {
    match species {
        Species::Dog => Rgb([31, 119, 180]),
        Species::Cat => Rgb([255, 127, 14]),
        Species::Bird => Rgb([44, 160, 44]),
        Species::Rabbit => Rgb([214, 39, 40]),
    }
}

/// Region inside the axes.
#[derive(Debug, Clone, Copy)]
struct PlotArea {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
}

impl PlotArea {
    fn for_canvas(width: u32, height: u32) -> Self {
        Self {
            left: 80.0,
            top: 80.0,
            right: width as f32 - 40.0,
            bottom: height as f32 - 110.0,
        }
    }

    fn width(&self) -> f32 {
        self.right - self.left
    }

    fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Vertical pixel position of `value` on a 0..=`y_top` axis.
    fn y_at(&self, value: f64, y_top: f64) -> f32 {
        self.bottom - (value / y_top) as f32 * self.height()
    }
}

/// Integer tick spacing giving at most ten steps up to `max`.
fn tick_step(max: f64) -> f64 {
    if max <= 10.0 { 1.0 } else { (max / 10.0).ceil() }
}

/// Axis top rounded up to a whole tick, never below one.
fn axis_top(max: f64) -> f64 {
    let step = tick_step(max);
    ((max / step).ceil() * step).max(1.0)
}

struct Canvas<'f> {
    image: RgbImage,
    font: &'f Font<'static>,
}

impl<'f> Canvas<'f> {
    fn new(width: u32, height: u32, font: &'f Font<'static>) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, WHITE),
            font,
        }
    }

    fn text_width(&self, size: f32, text: &str) -> i32 {
        text_size(Scale::uniform(size), self.font, text).0
    }

    /// Draws `text` with its top-left corner at (x, y).
    fn text(&mut self, x: i32, y: i32, size: f32, text: &str) {
        draw_text_mut(&mut self.image, BLACK, x, y, Scale::uniform(size), self.font, text);
    }

    fn centered_text(&mut self, center_x: i32, y: i32, size: f32, text: &str) {
        let x = center_x - self.text_width(size, text) / 2;
        self.text(x, y, size, text);
    }

    /// `text` shortened with an ellipsis to fit `max_width`, or `None` if nothing fits.
    fn fit(&self, size: f32, text: &str, max_width: i32) -> Option<String> {
        if self.text_width(size, text) <= max_width {
            return Some(text.to_string());
        }
        let mut chars: Vec<char> = text.chars().collect();
        while !chars.is_empty() {
            chars.pop();
            let candidate: String = chars.iter().chain(std::iter::once(&'…')).collect();
            if self.text_width(size, &candidate) <= max_width {
                return Some(candidate);
            }
        }
        None
    }

    fn title(&mut self, chart: ChartKind) {
        let center = self.image.width() as i32 / 2;
        self.centered_text(center, 20, TITLE_SIZE, chart.title());
    }

    /// Axes, horizontal grid lines, y tick values and the axis labels.
    fn axes(&mut self, area: PlotArea, chart: ChartKind, y_top: f64) {
        let step = tick_step(y_top);
        let mut value = 0.0;
        while value <= y_top {
            let y = area.y_at(value, y_top);
            if value > 0.0 {
                draw_line_segment_mut(&mut self.image, (area.left, y), (area.right, y), GRID);
            }
            let label = format!("{value}");
            let x = area.left as i32 - 8 - self.text_width(TICK_SIZE, &label);
            self.text(x, y as i32 - 7, TICK_SIZE, &label);
            value += step;
        }

        let (left, top, right, bottom) = (area.left, area.top, area.right, area.bottom);
        draw_line_segment_mut(&mut self.image, (left, bottom), (right, bottom), BLACK);
        draw_line_segment_mut(&mut self.image, (left, top), (left, bottom), BLACK);

        if let Some(label) = chart.x_label() {
            let center = (left + area.width() / 2.0) as i32;
            let y = self.image.height() as i32 - 36;
            self.centered_text(center, y, LABEL_SIZE, label);
        }
        if let Some(label) = chart.y_label() {
            self.text(left as i32 - 40, top as i32 - 30, LABEL_SIZE, label);
        }
    }
}

fn bar_chart(
    canvas: &mut Canvas<'_>,
    chart: ChartKind,
    bars: &[(String, f64)],
    color: Rgb<u8>,
) -> Result<(), ChartRenderError> {
    if bars.is_empty() {
        return Err(ChartRenderError::NoData);
    }

    let area = PlotArea::for_canvas(canvas.image.width(), canvas.image.height());
    let y_top = axis_top(bars.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max));
    canvas.title(chart);
    canvas.axes(area, chart, y_top);

    let slot = area.width() / bars.len() as f32;
    let bar_width = ((slot * 0.8) as u32).max(1);

    for (i, (label, value)) in bars.iter().enumerate() {
        let slot_left = area.left + slot * i as f32;
        let bar_height = (area.bottom - area.y_at(*value, y_top)).round() as u32;
        if bar_height > 0 {
            let x = (slot_left + slot * 0.1) as i32;
            let y = area.bottom as i32 - bar_height as i32;
            draw_filled_rect_mut(
                &mut canvas.image,
                Rect::at(x, y).of_size(bar_width, bar_height),
                color,
            );
        }

        if let Some(text) = canvas.fit(TICK_SIZE, label, slot as i32 - 4) {
            let center = (slot_left + slot / 2.0) as i32;
            canvas.centered_text(center, area.bottom as i32 + 8, TICK_SIZE, &text);
        }
    }

    Ok(())
}

/// Start angle and sweep of each slice, counterclockwise from twelve o'clock.
fn slice_angles(counts: &[f64]) -> Vec<(f64, f64)> {
    let total: f64 = counts.iter().sum();
    let mut start = PI / 2.0;
    counts
        .iter()
        .map(|count| {
            let sweep = count / total * 2.0 * PI;
            let slice = (start, sweep);
            start += sweep;
            slice
        })
        .collect()
}

/// Center and radius of the pie on a canvas, leaving room for title and slice labels.
fn pie_geometry(width: u32, height: u32) -> ((f64, f64), f64) {
    let center = (width as f64 / 2.0, height as f64 / 2.0 + 20.0);
    let radius = (width.min(height) as f64 / 2.0 - 150.0).max(10.0);
    (center, radius)
}

fn pie_chart(
    canvas: &mut Canvas<'_>,
    chart: ChartKind,
    species: &[Frequency<Species>],
) -> Result<(), ChartRenderError> {
    let counts: Vec<f64> = species.iter().map(|f| f.count as f64).collect();
    let total: f64 = counts.iter().sum();
    if total <= 0.0 {
        return Err(ChartRenderError::NoData);
    }

    canvas.title(chart);
    let (center, radius) = pie_geometry(canvas.image.width(), canvas.image.height());

    for (frequency, (start, sweep)) in species.iter().zip(slice_angles(&counts)) {
        if sweep <= 0.0 {
            continue;
        }
        let steps = ((sweep.to_degrees() / 2.0).ceil() as usize).max(2);

        let mut polygon = Vec::with_capacity(steps + 2);
        polygon.push(Point::new(center.0.round() as i32, center.1.round() as i32));
        for step in 0..=steps {
            let angle = start + sweep * step as f64 / steps as f64;
            let x = center.0 + radius * angle.cos();
            // image y grows downwards
            let y = center.1 - radius * angle.sin();
            let point = Point::new(x.round() as i32, y.round() as i32);
            if polygon.last() != Some(&point) {
                polygon.push(point);
            }
        }
        if polygon.last() == polygon.first() {
            polygon.pop();
        }
        if polygon.len() >= 3 {
            draw_polygon_mut(&mut canvas.image, &polygon, species_color(frequency.value));
        }

        let mid = start + sweep / 2.0;
        let share = frequency.count as f64 / total * 100.0;
        let label = format!("{} {share:.1}%", frequency.value);
        let mut x = (center.0 + (radius + 14.0) * mid.cos()) as i32;
        let y = (center.1 - (radius + 14.0) * mid.sin()) as i32 - 8;
        if mid.cos() < 0.0 {
            x -= canvas.text_width(LABEL_SIZE, &label);
        }
        canvas.text(x, y, LABEL_SIZE, &label);
    }

    Ok(())
}

fn scatter_chart(
    canvas: &mut Canvas<'_>,
    chart: ChartKind,
    points: &[(f64, f64)],
) -> Result<(), ChartRenderError> {
    if points.is_empty() {
        return Err(ChartRenderError::NoData);
    }

    let area = PlotArea::for_canvas(canvas.image.width(), canvas.image.height());
    let x_top = points.iter().map(|p| p.0).fold(0.0_f64, f64::max) + 1.0;
    let y_top = axis_top(points.iter().map(|p| p.1).fold(0.0_f64, f64::max) + 1.0);
    canvas.title(chart);
    canvas.axes(area, chart, y_top);

    let x_at = |value: f64| area.left + (value / x_top) as f32 * area.width();
    let step = tick_step(x_top);
    let mut tick = 0.0;
    while tick <= x_top {
        let label = format!("{tick}");
        canvas.centered_text(x_at(tick) as i32, area.bottom as i32 + 8, TICK_SIZE, &label);
        tick += step;
    }

    for (x, y) in points {
        let center = (x_at(*x).round() as i32, area.y_at(*y, y_top).round() as i32);
        draw_filled_circle_mut(&mut canvas.image, center, 6, MARKER);
    }

    Ok(())
}
