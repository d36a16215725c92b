use crate::layout::BoardLayout;
use arrayvec::ArrayString;
use board_common::{
    drawing_support::MAX_STRINGABLE_SECS,
    plates::{Loading, Plate},
    regions::Region,
    snapshot::BoardSnapshot,
    widgets::ClockReading,
};
use core::fmt::Write;
use embedded_graphics::{
    geometry::{Point, Size},
    mono_font::{
        MonoFont, MonoTextStyle,
        ascii::{
            FONT_4X6, FONT_5X8, FONT_6X10, FONT_7X13_BOLD, FONT_9X15_BOLD, FONT_9X18_BOLD,
            FONT_10X20,
        },
    },
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{Circle, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, StrokeAlignment},
    text::{Baseline, Text},
};

const WHITE: Rgb888 = Rgb888::WHITE;
const RED: Rgb888 = Rgb888::RED;
const AQUA: Rgb888 = Rgb888::new(0, 255, 255);
const YELLOW: Rgb888 = Rgb888::YELLOW;
const SKY_BLUE: Rgb888 = Rgb888::new(135, 206, 235);
const PENDING: Rgb888 = Rgb888::new(48, 48, 48);
const SLEEVE: Rgb888 = Rgb888::new(160, 160, 160);
const COLLAR: Rgb888 = Rgb888::new(96, 96, 96);

/// Largest first
const FONTS: [&MonoFont<'static>; 7] = [
    &FONT_10X20,
    &FONT_9X18_BOLD,
    &FONT_9X15_BOLD,
    &FONT_7X13_BOLD,
    &FONT_6X10,
    &FONT_5X8,
    &FONT_4X6,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
}

/// Draws the board as described by `snapshot` onto the display, using the
/// positions in `layout`. Only the visible regions are drawn.
pub fn draw_board<D: DrawTarget<Color = Rgb888>>(
    display: &mut D,
    snapshot: &BoardSnapshot,
    layout: &BoardLayout,
) -> Result<(), D::Error> {
    display.clear(Rgb888::BLACK)?;

    if !snapshot.shows(Region::Container) {
        return Ok(());
    }

    if snapshot.shows(Region::Name) {
        draw_text(display, &snapshot.last_name, layout.last_name, WHITE, Align::Left)?;
        draw_text(display, &snapshot.first_name, layout.first_name, WHITE, Align::Left)?;
    }

    if snapshot.shows(Region::Team) {
        draw_text(display, &snapshot.team_name, layout.team, WHITE, Align::Left)?;
    }

    if snapshot.shows(Region::StartNumber) {
        draw_start_number(display, snapshot.start_number, layout.start_number)?;
    }

    if snapshot.shows(Region::Attempt) {
        if let Some(attempt) = snapshot.attempt {
            let mut text = ArrayString::<32>::new();
            if write!(&mut text, "{attempt}").is_ok() {
                draw_text(display, &text, layout.attempt, WHITE, Align::Center)?;
            }
        }
    }

    if snapshot.shows(Region::Weight) {
        draw_text(display, &snapshot.weight_text, layout.weight, AQUA, Align::Left)?;
    }

    if snapshot.shows(Region::Barbell) {
        draw_barbell(display, &snapshot.barbell, layout.barbell)?;
    }

    if snapshot.shows(Region::AthleteTimer) {
        let clock = clock_string(snapshot.athlete_clock);
        draw_text(display, &clock, layout.timer, YELLOW, Align::Center)?;
    } else if snapshot.shows(Region::BreakTimer) {
        let clock = clock_string(snapshot.break_clock);
        draw_text(display, &clock, layout.timer, SKY_BLUE, Align::Center)?;
    }

    if snapshot.shows(Region::Decision) {
        draw_decision(
            display,
            snapshot.decision.ordered(snapshot.public_facing),
            layout.decision,
        )?;
    }

    Ok(())
}

/// `m:ss`, or `--:--` for a clock without an end time
pub fn clock_string(reading: ClockReading) -> ArrayString<5> {
    match reading {
        ClockReading::Indefinite => ArrayString::from("--:--").unwrap_or_default(),
        ClockReading::Remaining { secs, .. } => secs_to_time_string(secs),
    }
}

pub fn secs_to_time_string(secs: u32) -> ArrayString<5> {
    let secs = secs.min(MAX_STRINGABLE_SECS);
    let mut time_string = ArrayString::new();
    write!(&mut time_string, "{}:{:02}", secs / 60, secs % 60)
        .map(|_| time_string)
        .unwrap_or_default()
}

fn text_width(font: &MonoFont, chars: usize) -> u32 {
    if chars == 0 {
        return 0;
    }
    let advance = font.character_size.width + font.character_spacing;
    advance * chars as u32 - font.character_spacing
}

/// Picks the largest font that fits the area's height, preferring one that
/// also fits the text's width. Returns the font and how many characters fit.
fn fit_text(text: &str, area: Size) -> Option<(&'static MonoFont<'static>, usize)> {
    let chars = text.chars().count();
    let mut tallest_fitting = None;
    for font in FONTS {
        if font.character_size.height > area.height {
            continue;
        }
        if text_width(font, chars) <= area.width {
            return Some((font, chars));
        }
        tallest_fitting.get_or_insert(font);
    }

    let font = tallest_fitting?;
    let advance = font.character_size.width + font.character_spacing;
    let fits = ((area.width + font.character_spacing) / advance) as usize;
    Some((font, fits))
}

/// Shortens `text` to `max` characters, marking the cut with `..`
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max <= 2 {
        return ".".repeat(max);
    }
    let mut short: String = text.chars().take(max - 2).collect();
    short.push_str("..");
    short
}

fn draw_text<D: DrawTarget<Color = Rgb888>>(
    display: &mut D,
    text: &str,
    area: Rectangle,
    color: Rgb888,
    align: Align,
) -> Result<(), D::Error> {
    if text.is_empty() {
        return Ok(());
    }
    let Some((font, max_chars)) = fit_text(text, area.size) else {
        return Ok(());
    };
    let text = truncate(text, max_chars);
    let width = text_width(font, text.chars().count());

    let x = match align {
        Align::Left => area.top_left.x,
        Align::Center => area.top_left.x + (area.size.width.saturating_sub(width) / 2) as i32,
    };
    let y = area.top_left.y + (area.size.height - font.character_size.height) as i32 / 2;

    Text::with_baseline(
        &text,
        Point::new(x, y),
        MonoTextStyle::new(font, color),
        Baseline::Top,
    )
    .draw(display)?;
    Ok(())
}

fn draw_start_number<D: DrawTarget<Color = Rgb888>>(
    display: &mut D,
    start_number: i32,
    area: Rectangle,
) -> Result<(), D::Error> {
    const MARGIN: u32 = 2;

    let mut text = ArrayString::<11>::new();
    if write!(&mut text, "{start_number}").is_err() {
        return Ok(());
    }
    let inner = Size::new(
        area.size.width.saturating_sub(2 * MARGIN),
        area.size.height.saturating_sub(2 * MARGIN),
    );
    let Some((font, max_chars)) = fit_text(&text, inner) else {
        return Ok(());
    };
    let text = truncate(&text, max_chars);
    let width = text_width(font, text.chars().count());

    let frame = Size::new(width + 2 * MARGIN, font.character_size.height + 2 * MARGIN);
    let top_left = area.top_left
        + Point::new(
            (area.size.width.saturating_sub(frame.width) / 2) as i32,
            (area.size.height.saturating_sub(frame.height) / 2) as i32,
        );

    Rectangle::new(top_left, frame)
        .into_styled(
            PrimitiveStyleBuilder::new()
                .stroke_color(RED)
                .stroke_width(1)
                .stroke_alignment(StrokeAlignment::Inside)
                .build(),
        )
        .draw(display)?;

    Text::with_baseline(
        &text,
        top_left + Point::new(MARGIN as i32, MARGIN as i32),
        MonoTextStyle::new(font, WHITE),
        Baseline::Top,
    )
    .draw(display)?;
    Ok(())
}

/// Competition plates follow the IWF colour code
pub fn plate_color(plate: Plate) -> Rgb888 {
    match plate {
        Plate::Kg25 | Plate::Kg2_5 => RED,
        Plate::Kg20 | Plate::Kg2 => Rgb888::new(0, 80, 255),
        Plate::Kg15 | Plate::Kg1_5 => YELLOW,
        Plate::Kg10 | Plate::Kg1 => Rgb888::new(0, 160, 0),
        Plate::Kg5 | Plate::Kg0_5 => WHITE,
    }
}

/// One sleeve of the bar seen from the front, the inside is on the left
fn draw_barbell<D: DrawTarget<Color = Rgb888>>(
    display: &mut D,
    loading: &Loading,
    area: Rectangle,
) -> Result<(), D::Error> {
    if loading.is_empty() {
        return Ok(());
    }

    let center_y = area.top_left.y + area.size.height as i32 / 2;
    let sleeve_height = (area.size.height / 16).max(1);
    Rectangle::new(
        Point::new(area.top_left.x, center_y - sleeve_height as i32 / 2),
        Size::new(area.size.width, sleeve_height),
    )
    .into_styled(PrimitiveStyle::with_fill(SLEEVE))
    .draw(display)?;

    let slots = (loading.per_side.len() + usize::from(loading.collars)).max(8) as u32;
    let slot = area.size.width / slots;
    let plate_width = slot.saturating_sub(1).max(1);
    let mut x = area.top_left.x;

    for plate in &loading.per_side {
        let height = if plate.is_bumper() {
            area.size.height * 9 / 10
        } else {
            area.size.height * plate.grams() / 10_000 / 2 + area.size.height / 4
        }
        .min(area.size.height);
        Rectangle::new(
            Point::new(x, center_y - height as i32 / 2),
            Size::new(plate_width, height),
        )
        .into_styled(PrimitiveStyle::with_fill(plate_color(*plate)))
        .draw(display)?;
        x += slot as i32;
    }

    if loading.collars {
        let height = area.size.height / 5;
        Rectangle::new(
            Point::new(x, center_y - height as i32 / 2),
            Size::new(plate_width, height),
        )
        .into_styled(PrimitiveStyle::with_fill(COLLAR))
        .draw(display)?;
    }

    Ok(())
}

/// Three referee lights side by side, already in display order
fn draw_decision<D: DrawTarget<Color = Rgb888>>(
    display: &mut D,
    lights: [Option<bool>; 3],
    area: Rectangle,
) -> Result<(), D::Error> {
    let cell = area.size.width / 3;
    let diameter = cell.saturating_sub(cell / 5).min(area.size.height);
    let top = area.top_left.y + (area.size.height - diameter) as i32 / 2;

    for (i, light) in lights.into_iter().enumerate() {
        let color = match light {
            Some(true) => WHITE,
            Some(false) => RED,
            None => PENDING,
        };
        let left = area.top_left.x + (cell * i as u32 + (cell - diameter) / 2) as i32;
        Circle::new(Point::new(left, top), diameter)
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(display)?;
    }
    Ok(())
}
