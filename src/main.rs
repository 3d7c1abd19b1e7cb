use clap::Parser;
use iced::widget::image::Handle;
use iced::widget::{
    button, column, container, horizontal_space, pick_list, row, scrollable, slider, text, toggler,
    Column,
};
use iced::{ContentFit, Element, Length, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;
use std::process::ExitCode;

use axis_finder::overlay::{render_async, LatestWins};
use axis_finder::{Catalog, Palette, ViewParams};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "axis-finder")]
#[command(about = "Find the rotation axis of a tomographic image series")]
#[command(version)]
struct Args {
    /// Directory containing the images
    image_dir: PathBuf,

    /// Development mode: verbose logging
    #[arg(long)]
    dev: bool,
}

/// Main application state
struct AxisFinder {
    /// The image series, scanned once at startup
    catalog: Catalog,
    /// Shared image size (width, height)
    dims: (u32, u32),
    /// Everything the operator can adjust
    params: ViewParams,
    /// Outcome of the most recent render request
    overlay: LatestWins<Handle>,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    RangeStartChanged(u32),
    RangeEndChanged(u32),
    SelectedChanged(u32),
    NextImage,
    PreviousImage,
    CenterXChanged(i32),
    CenterYChanged(i32),
    CropWidthChanged(u32),
    CropHeightChanged(u32),
    ShowDiffToggled(bool),
    InvertColorsToggled(bool),
    PaletteSelected(Palette),
    /// User clicked the "Export" button
    Export,
    /// Background render finished; stale generations are dropped
    Rendered(u64, Result<Vec<u8>, String>),
}

impl AxisFinder {
    /// Create the application for a non-empty catalog and start the first render
    fn new(catalog: Catalog) -> (Self, Task<Message>) {
        let dims = catalog.dimensions().unwrap_or((1, 1));
        let params = ViewParams::new(catalog.len(), dims.0, dims.1);

        let status = format!(
            "{} images of {}x{} in {}",
            catalog.len(),
            dims.0,
            dims.1,
            catalog.dir().display()
        );

        let mut app = AxisFinder {
            catalog,
            dims,
            params,
            overlay: LatestWins::new(),
            status,
        };
        let task = app.refresh();

        (app, task)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        let (width, height) = self.dims;
        let count = self.catalog.len();

        match message {
            Message::RangeStartChanged(start) => {
                self.params.set_range(start as usize, self.params.range_end, count);
            }
            Message::RangeEndChanged(end) => {
                self.params.set_range(self.params.range_start, end as usize, count);
            }
            Message::SelectedChanged(selected) => self.params.set_selected(selected as usize),
            Message::NextImage => self.params.next(),
            Message::PreviousImage => self.params.previous(),
            Message::CenterXChanged(x) => {
                self.params.set_center(x, self.params.center_y, width, height);
            }
            Message::CenterYChanged(y) => {
                self.params.set_center(self.params.center_x, y, width, height);
            }
            Message::CropWidthChanged(w) => {
                self.params.set_crop_size(w, self.params.crop_height, width, height);
            }
            Message::CropHeightChanged(h) => {
                self.params.set_crop_size(self.params.crop_width, h, width, height);
            }
            Message::ShowDiffToggled(on) => self.params.show_diff = on,
            Message::InvertColorsToggled(on) => self.params.invert_colors = on,
            Message::PaletteSelected(palette) => self.params.palette = palette,
            Message::Export => {
                self.export();
                return Task::none();
            }
            Message::Rendered(generation, result) => {
                if let Err(err) = &result {
                    log::error!("Render {} failed: {}", generation, err);
                }
                // A newer request is in flight; its result supersedes this one
                if !self.overlay.accept(generation, result.map(Handle::from_bytes)) {
                    log::debug!("Dropping stale render {}", generation);
                }
                return Task::none();
            }
        }

        self.refresh()
    }

    /// Start rendering the current parameters in the background
    fn refresh(&mut self) -> Task<Message> {
        let Some(request) = self.params.request(&self.catalog) else {
            return Task::none();
        };

        let generation = self.overlay.next();

        Task::perform(render_async(request), move |result| {
            Message::Rendered(generation, result.map_err(|e| e.to_string()))
        })
    }

    /// Save the summary as JSON through a native dialog
    fn export(&mut self) {
        let target = FileDialog::new()
            .set_title("Export axis parameters")
            .set_directory(self.catalog.dir())
            .set_file_name("axis.json")
            .add_filter("JSON", &["json"])
            .save_file();

        let Some(path) = target else {
            return;
        };

        self.status = match self.params.summary(&self.catalog).export(&path) {
            Ok(()) => format!("Exported to {}", path.display()),
            Err(err) => {
                log::error!("{}", err);
                err.to_string()
            }
        };
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let params = &self.params;
        let (width, height) = self.dims;
        let count = self.catalog.len() as u32;

        let range = row![
            labeled(
                format!("Range start: {}", params.range_start),
                slider(1..=count, params.range_start as u32, Message::RangeStartChanged),
            ),
            labeled(
                format!("Range end: {}", params.range_end),
                slider(1..=count, params.range_end as u32, Message::RangeEndChanged),
            ),
        ]
        .spacing(10);

        let selection = labeled(
            format!("Selected image: {} / {}", params.selected, params.span()),
            slider(1..=params.span() as u32, params.selected as u32, Message::SelectedChanged),
        );

        let crop = column![
            row![
                labeled(
                    format!("Center X: {}", params.center_x),
                    slider(0..=width as i32, params.center_x, Message::CenterXChanged),
                ),
                labeled(
                    format!("Center Y: {}", params.center_y),
                    slider(0..=height as i32, params.center_y, Message::CenterYChanged),
                ),
            ]
            .spacing(10),
            row![
                labeled(
                    format!("Crop width: {}", params.crop_width),
                    slider(1..=width, params.crop_width, Message::CropWidthChanged),
                ),
                labeled(
                    format!("Crop height: {}", params.crop_height),
                    slider(1..=height, params.crop_height, Message::CropHeightChanged),
                ),
            ]
            .spacing(10),
        ]
        .spacing(10);

        let navigation = row![
            button("Previous image")
                .on_press(Message::PreviousImage)
                .width(Length::Fill),
            button("Next image")
                .on_press(Message::NextImage)
                .width(Length::Fill),
        ]
        .spacing(10);

        let visualization = row![
            column![
                toggler(params.show_diff)
                    .label("Show difference image")
                    .on_toggle(Message::ShowDiffToggled),
                toggler(params.invert_colors)
                    .label("Invert colors")
                    .on_toggle(Message::InvertColorsToggled),
            ]
            .spacing(8),
            horizontal_space(),
            pick_list(&Palette::ALL[..], Some(params.palette), Message::PaletteSelected),
        ]
        .spacing(10);

        let summary = params.summary(&self.catalog).to_text();

        let controls: Column<Message> = column![
            text("Axis Finder").size(32),
            text("The image range specifies the images covering a rotation angle of 180°:").size(14),
            range,
            text("Index of the currently selected image within the range:").size(14),
            selection,
            text("Crop settings").size(20),
            crop,
            navigation,
            text("Visualization settings").size(20),
            visualization,
            text("Summary").size(20),
            text(summary).font(iced::Font::MONOSPACE).size(13),
            button("Export").on_press(Message::Export),
            text(&self.status).size(12),
        ]
        .spacing(12)
        .padding(10);

        let viewer: Element<Message> = match self.overlay.current() {
            Some(Ok(handle)) => iced::widget::image(handle.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            Some(Err(err)) => container(text(format!("Render failed: {}", err)))
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into(),
            None => container(text("Rendering..."))
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into(),
        };

        row![
            container(scrollable(controls)).width(Length::Fixed(500.0)),
            container(viewer).width(Length::Fill).height(Length::Fill),
        ]
        .spacing(10)
        .padding(10)
        .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Slider (or any widget) with a caption above it
fn labeled<'a>(label: String, widget: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    column![text(label).size(14), widget.into()].spacing(4).into()
}

fn init_logging(dev: bool) {
    let default_level = if dev { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.dev);

    let catalog = match Catalog::scan(&args.image_dir) {
        Ok(catalog) => catalog,
        Err(err) => {
            log::error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    if catalog.is_empty() {
        log::error!("No images found in {}", args.image_dir.display());
        return ExitCode::FAILURE;
    }

    log::info!("Axis Finder initialized with {} images", catalog.len());

    let result = iced::application("Axis Finder", AxisFinder::update, AxisFinder::view)
        .theme(AxisFinder::theme)
        .centered()
        .run_with(move || AxisFinder::new(catalog));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
