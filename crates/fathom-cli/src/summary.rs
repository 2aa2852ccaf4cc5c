use console::Style;
use fathom_core::color::ColorScheme;
use fathom_core::pipeline::config::SurveyConfig;
use fathom_core::pipeline::BlockProcessor;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

fn print_title(s: &Styles, title: &str) {
    println!();
    println!("  {}", s.title.apply_to(title));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(title.chars().count())));
    println!();
}

pub fn print_blocks_summary(
    config: &SurveyConfig,
    processor: &BlockProcessor,
    left: u32,
    right: u32,
    colormap: Option<ColorScheme>,
) {
    let s = Styles::new();
    print_title(&s, "Fathom Blocks");

    println!(
        "  {:<14}{}",
        s.label.apply_to("Metadata"),
        s.path.apply_to(config.metadata.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Survey"),
        s.path.apply_to(config.survey.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(config.output.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Records"),
        s.value.apply_to(format!(
            "{} ({} skipped)",
            processor.record_count(),
            processor.skipped()
        ))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Scan type"),
        s.method.apply_to(processor.transducer().scan_type)
    );
    println!();

    let b = &config.blocks;
    println!("  {}", s.header.apply_to("Blocks"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Channels"),
        s.value.apply_to(format!("{left} / {right}"))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Size"),
        s.value.apply_to(format!("{} records", b.block_size))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Width"),
        s.value.apply_to(format!("{} px + {} px gap", b.width, b.gap))
    );
    if b.auto_align {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Align"),
            s.method.apply_to(format!("auto, max {} ({:+} manual)", b.max_shift, b.manual_shift))
        );
    } else {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Align"),
            s.disabled.apply_to(format!("off ({:+} manual)", b.manual_shift))
        );
    }
    match colormap {
        Some(scheme) => println!(
            "    {:<12}{}",
            s.label.apply_to("Colormap"),
            s.method.apply_to(scheme)
        ),
        None => println!(
            "    {:<12}{}",
            s.label.apply_to("Colormap"),
            s.disabled.apply_to("grayscale PNG")
        ),
    }
    println!();
}

pub fn print_video_summary(config: &SurveyConfig, source: &str) {
    let s = Styles::new();
    print_title(&s, "Fathom Waterfall");

    let v = &config.video;
    let d = &config.display;
    println!(
        "  {:<14}{}",
        s.label.apply_to("Source"),
        s.path.apply_to(source)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(config.output.display())
    );
    println!();

    println!("  {}", s.header.apply_to("Video"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Height"),
        s.value.apply_to(format!("{} px ({} px strips)", v.video_height, v.row_height))
    );
    match v.max_frames {
        Some(n) => println!(
            "    {:<12}{}",
            s.label.apply_to("Frames"),
            s.value.apply_to(n)
        ),
        None => println!(
            "    {:<12}{}",
            s.label.apply_to("Frames"),
            s.disabled.apply_to("unlimited")
        ),
    }
    println!();

    println!("  {}", s.header.apply_to("Display"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Mode"),
        s.method.apply_to(d.preview_mode)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Colormap"),
        s.method.apply_to(d.color_scheme())
    );
    if d.align_channels {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Align"),
            s.value.apply_to(format!(
                "max {} px, median of {}",
                d.max_align_shift, d.smooth_shift
            ))
        );
    } else {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Align"),
            s.disabled.apply_to("off")
        );
    }
    println!();
}
