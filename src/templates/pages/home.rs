// templates/pages/home.rs

use crate::templates::desktop_layout;
use maud::{html, Markup};

/// Landing page: upload form plus a short note on expected columns.
pub fn home_page(has_session: bool) -> Markup {
    desktop_layout(
        "上传数据",
        html! {
            main class="container" {
                div class="card" {
                    h1 { "上传房源 CSV 文件" }
                    p {
                        "支持同时上传多个文件。文件名含「成交」视为成交房源，"
                        "含「在售」视为在售房源，其余按下方默认类型处理。"
                    }

                    form action="/upload" method="post" enctype="multipart/form-data" {
                        label { "选择文件（可多选）" }
                        input type="file" name="files" accept=".csv" multiple required;

                        label for="fallback" { "无法从文件名识别时的默认类型" }
                        select name="fallback" id="fallback" {
                            option value="active" selected { "在售房源" }
                            option value="transaction" { "成交房源" }
                        }

                        @if has_session {
                            label {
                                input type="checkbox" name="append" value="1";
                                " 追加到当前数据（否则替换）"
                            }
                        }

                        button type="submit" { "上传并分析" }
                    }
                }

                div class="card" {
                    h3 { "文件要求" }
                    p { "必需列：总价(万) 或 价格，以及 面积(㎡)。" }
                    p {
                        "可选列：小区名称、区域、商圈、户型、成交日期、挂牌价(万)、"
                        "成交周期(天)、建成年代、装修、楼层、关注人数。"
                    }
                    p { "编码支持 UTF-8（含 BOM）与 GBK/GB18030。" }
                }
            }
        },
    )
}
