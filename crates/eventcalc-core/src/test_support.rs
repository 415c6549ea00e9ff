//! Workbook fixtures written at test time.

use rust_xlsxwriter::{ExcelDateTime, Format, Workbook as XlsxWorkbook, XlsxError};
use std::path::{Path, PathBuf};

pub(crate) fn write_workbook<F>(dir: &Path, file_name: &str, build: F) -> PathBuf
where
    F: FnOnce(&mut XlsxWorkbook) -> Result<(), XlsxError>,
{
    let path = dir.join(file_name);
    let mut workbook = XlsxWorkbook::new();
    build(&mut workbook).unwrap();
    workbook.save(&path).unwrap();
    path
}

/// A small version of the calculator: a `TEMPLATE` sheet with the block at
/// C27:O30 (one formula cell in column J), a city sheet and a lists sheet.
pub(crate) fn calculator_workbook(dir: &Path) -> PathBuf {
    write_workbook(dir, "calculator.xlsx", |wb| {
        let cities = wb.add_worksheet();
        cities.set_name("ЦА по городам")?;
        cities.write_string(0, 0, "Город")?;
        cities.write_string(1, 0, "Москва")?;
        cities.write_string(2, 0, " Казань ")?;
        cities.write_string(3, 0, "Москва")?;
        cities.write_string(5, 0, "Сочи")?;

        let template = wb.add_worksheet();
        template.set_name("TEMPLATE")?;
        // Row 27 (index 26): channel names in C, inputs in D..I, outputs in J..O.
        template.write_string(26, 2, "Billboards")?;
        template.write_string(26, 3, "Outdoor")?;
        template.write_number(26, 5, 14.0)?;
        template.write_number(26, 6, 0.5)?;
        template.write_formula(26, 9, "=F27*G27")?;
        template.write_string(27, 2, "Radio")?;
        template.write_number(27, 5, 7.0)?;
        template.write_string(29, 14, "note")?;

        let lists = wb.add_worksheet();
        lists.set_name("Списки")?;
        lists.write_string(0, 1, "Формат ООН")?;
        lists.write_string(1, 1, "Баннер 3x6")?;
        lists.write_string(2, 1, "Баннер 3x6")?;
        lists.write_string(1, 2, " Видео 15с ")?;
        // G is not a format list.
        lists.write_string(1, 6, "Не формат")?;
        lists.write_string(0, 22, "Тип площадки")?;
        lists.write_string(1, 22, "Площадка")?;
        lists.write_string(2, 22, "Парк")?;
        // After the blank W4, so not a venue type.
        lists.write_string(4, 22, "Стадион")?;
        Ok(())
    })
}

/// A first-row-header sheet with `rows` data rows.
pub(crate) fn header_workbook(dir: &Path, rows: u32) -> PathBuf {
    write_workbook(dir, "headers.xlsx", |wb| {
        let sheet = wb.add_worksheet();
        sheet.set_name("Data")?;
        sheet.write_string(0, 0, "Channel")?;
        sheet.write_string(0, 1, "Format")?;
        sheet.write_string(0, 2, "OTS 16+ ('000)")?;
        for r in 1..=rows {
            sheet.write_string(r, 0, format!("Channel {r}"))?;
            sheet.write_string(r, 1, "Digital")?;
            sheet.write_number(r, 2, r as f64 * 10.0)?;
        }
        Ok(())
    })
}

/// First-row headers with a blank header cell, a date and a boolean.
pub(crate) fn typed_workbook(dir: &Path) -> PathBuf {
    write_workbook(dir, "typed.xlsx", |wb| {
        let sheet = wb.add_worksheet();
        sheet.set_name("Data")?;
        sheet.write_string(0, 0, "Channel")?;
        sheet.write_string(0, 2, "Start")?;
        sheet.write_string(0, 3, "Active")?;
        sheet.write_string(1, 0, "TV")?;
        sheet.write_string(1, 1, "x")?;
        let date = ExcelDateTime::from_ymd(2024, 5, 17)?;
        sheet.write_datetime_with_format(1, 2, &date, &Format::new().set_num_format("yyyy-mm-dd"))?;
        sheet.write_boolean(1, 3, true)?;
        Ok(())
    })
}

/// First-row headers with a repeated name and a column called `ROW`.
pub(crate) fn duplicate_header_workbook(dir: &Path) -> PathBuf {
    write_workbook(dir, "duplicates.xlsx", |wb| {
        let sheet = wb.add_worksheet();
        sheet.set_name("Data")?;
        sheet.write_string(0, 0, "Format")?;
        sheet.write_string(0, 1, "Format")?;
        sheet.write_string(0, 2, "ROW")?;
        sheet.write_string(1, 0, "Banner")?;
        sheet.write_string(1, 1, "Video")?;
        sheet.write_number(1, 2, 7.0)?;
        Ok(())
    })
}
