//! Action handlers

use anyhow::{Context, Result};
use colored::Colorize;
use smartplug_client::{Device, SmartPlug, SmartPlugBuilder};
use tracing::debug;

use crate::Cli;

pub async fn run(cli: &Cli) -> Result<()> {
    let plug = SmartPlugBuilder::new()
        .port(cli.port)
        .connect_timeout(cli.connect_timeout())
        .read_timeout(cli.read_timeout())
        .check_device_errors(cli.check_errors)
        .build();

    let device = match cli.child {
        Some(index) => Device::outlet(cli.host.as_str(), index),
        None => Device::new(cli.host.as_str()),
    };
    debug!("Target {} on port {}", device, cli.port);

    if cli.get_state {
        print_state(&plug, &device).await
    } else if cli.on || cli.off {
        plug.set_power(&device, cli.on)
            .await
            .with_context(|| format!("Failed to switch {}", device))
    } else if cli.info {
        print_info(&plug, &device).await
    } else if cli.meter {
        print_meter(&plug, &device).await
    } else {
        // The action group guarantees --daystat, which requires both fields
        let (Some(month), Some(year)) = (cli.month, cli.year) else {
            anyhow::bail!("--daystat needs --month and --year");
        };
        print_daystat(&plug, &device, month, year).await
    }
}

async fn print_state(plug: &SmartPlug, device: &Device) -> Result<()> {
    let on = plug
        .is_on(device)
        .await
        .with_context(|| format!("Failed to read state of {}", device))?;

    println!("{} is {}", device.host(), if on { "ON" } else { "OFF" });
    Ok(())
}

async fn print_info(plug: &SmartPlug, device: &Device) -> Result<()> {
    let response = plug
        .system_info(device)
        .await
        .with_context(|| format!("Failed to query {}", device))?;

    println!("{}", serde_json::to_string_pretty(response.sysinfo())?);
    Ok(())
}

async fn print_meter(plug: &SmartPlug, device: &Device) -> Result<()> {
    let response = plug
        .meter_info(device)
        .await
        .with_context(|| format!("Failed to read meter of {}", device))?;

    let realtime = &response.emeter.get_realtime;
    let gains = &response.emeter.get_vgain_igain;

    println!("{}", device.to_string().cyan().bold());
    println!("Voltage:  {:.2} V", realtime.volts());
    println!("Current:  {:.3} A", realtime.amps());
    println!("Power:    {:.2} W", realtime.watts());
    println!("Total:    {:.3} kWh", realtime.kilowatt_hours());
    println!("Gains:    vgain {} igain {}", gains.vgain, gains.igain);
    Ok(())
}

async fn print_daystat(plug: &SmartPlug, device: &Device, month: u8, year: u16) -> Result<()> {
    let response = plug
        .daily_stats(device, month, year)
        .await
        .with_context(|| format!("Failed to read daily stats of {}", device))?;

    let days = &response.emeter.get_daystat.day_list;
    if days.is_empty() {
        println!("No readings for {:04}-{:02}", year, month);
        return Ok(());
    }

    let mut total = 0.0;
    for day in days {
        let kwh = day.kilowatt_hours();
        total += kwh;
        println!("{:04}-{:02}-{:02}  {:.3} kWh", day.year, day.month, day.day, kwh);
    }
    println!("{}  {:.3} kWh", "Total".green(), total);
    Ok(())
}
